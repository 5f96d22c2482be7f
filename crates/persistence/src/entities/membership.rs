//! Plan membership entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Membership, MembershipStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for membership_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "membership_status", rename_all = "lowercase")]
pub enum MembershipStatusDb {
    Owner,
    Member,
    Withdrawn,
    Kicked,
    Blocked,
}

impl From<MembershipStatusDb> for MembershipStatus {
    fn from(db_status: MembershipStatusDb) -> Self {
        match db_status {
            MembershipStatusDb::Owner => MembershipStatus::Owner,
            MembershipStatusDb::Member => MembershipStatus::Member,
            MembershipStatusDb::Withdrawn => MembershipStatus::Withdrawn,
            MembershipStatusDb::Kicked => MembershipStatus::Kicked,
            MembershipStatusDb::Blocked => MembershipStatus::Blocked,
        }
    }
}

impl From<MembershipStatus> for MembershipStatusDb {
    fn from(status: MembershipStatus) -> Self {
        match status {
            MembershipStatus::Owner => MembershipStatusDb::Owner,
            MembershipStatus::Member => MembershipStatusDb::Member,
            MembershipStatus::Withdrawn => MembershipStatusDb::Withdrawn,
            MembershipStatus::Kicked => MembershipStatusDb::Kicked,
            MembershipStatus::Blocked => MembershipStatusDb::Blocked,
        }
    }
}

/// Database row mapping for the plan_members table.
#[derive(Debug, Clone, FromRow)]
pub struct MembershipEntity {
    pub plan_id: Uuid,
    pub user_id: Uuid,
    pub status: MembershipStatusDb,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MembershipEntity> for Membership {
    fn from(entity: MembershipEntity) -> Self {
        Self {
            plan_id: entity.plan_id,
            user_id: entity.user_id,
            status: entity.status.into(),
            joined_at: entity.joined_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_status_db_round_trips_every_status() {
        for status in [
            MembershipStatus::Owner,
            MembershipStatus::Member,
            MembershipStatus::Withdrawn,
            MembershipStatus::Kicked,
            MembershipStatus::Blocked,
        ] {
            let db: MembershipStatusDb = status.into();
            assert_eq!(MembershipStatus::from(db), status);
        }
    }
}
