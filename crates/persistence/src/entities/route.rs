//! Route entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the routes table.
#[derive(Debug, Clone, FromRow)]
pub struct RouteEntity {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RouteEntity> for domain::models::Route {
    fn from(entity: RouteEntity) -> Self {
        Self {
            id: entity.id,
            plan_id: entity.plan_id,
            name: entity.name,
            description: entity.description,
            is_deleted: entity.is_deleted,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
