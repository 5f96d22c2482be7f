//! Invite code entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the invite_codes table.
#[derive(Debug, Clone, FromRow)]
pub struct InviteCodeEntity {
    pub code: String,
    pub plan_id: Uuid,
    pub created_by: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<InviteCodeEntity> for domain::models::InviteCode {
    fn from(entity: InviteCodeEntity) -> Self {
        Self {
            code: entity.code,
            plan_id: entity.plan_id,
            created_by: entity.created_by,
            expires_at: entity.expires_at,
            created_at: entity.created_at,
        }
    }
}
