//! Plan entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the plans table.
#[derive(Debug, Clone, FromRow)]
pub struct PlanEntity {
    pub id: Uuid,
    pub name: String,
    pub is_public: bool,
    pub is_deleted: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlanEntity> for domain::models::Plan {
    fn from(entity: PlanEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            is_public: entity.is_public,
            is_deleted: entity.is_deleted,
            start_date: entity.start_date,
            end_date: entity.end_date,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
