//! User directory entity (database row mapping).

use domain::models::{User, UserStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for user_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
pub enum UserStatusDb {
    Active,
    Withdrawn,
    Deleted,
    Suspended,
    Blocked,
}

impl From<UserStatusDb> for UserStatus {
    fn from(db_status: UserStatusDb) -> Self {
        match db_status {
            UserStatusDb::Active => UserStatus::Active,
            UserStatusDb::Withdrawn => UserStatus::Withdrawn,
            UserStatusDb::Deleted => UserStatus::Deleted,
            UserStatusDb::Suspended => UserStatus::Suspended,
            UserStatusDb::Blocked => UserStatus::Blocked,
        }
    }
}

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub nickname: String,
    pub status: UserStatusDb,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            nickname: entity.nickname,
            status: entity.status.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_entity_conversion() {
        let entity = UserEntity {
            id: Uuid::new_v4(),
            nickname: "mina".to_string(),
            status: UserStatusDb::Suspended,
        };
        let user: User = entity.clone().into();
        assert_eq!(user.id, entity.id);
        assert_eq!(user.status, UserStatus::Suspended);
        assert!(!user.status.is_active());
    }
}
