//! User models as seen through the user directory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account state of a user in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Withdrawn,
    Deleted,
    Suspended,
    Blocked,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Withdrawn => "withdrawn",
            UserStatus::Deleted => "deleted",
            UserStatus::Suspended => "suspended",
            UserStatus::Blocked => "blocked",
        }
    }

    /// Only active users may act on plans.
    pub fn is_active(&self) -> bool {
        matches!(self, UserStatus::Active)
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(UserStatus::Active),
            "withdrawn" => Ok(UserStatus::Withdrawn),
            "deleted" => Ok(UserStatus::Deleted),
            "suspended" => Ok(UserStatus::Suspended),
            "blocked" => Ok(UserStatus::Blocked),
            _ => Err(format!("Invalid user status: {}", s)),
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user known to the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct User {
    pub id: Uuid,
    pub nickname: String,
    pub status: UserStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_status_is_active() {
        assert!(UserStatus::Active.is_active());
        assert!(!UserStatus::Withdrawn.is_active());
        assert!(!UserStatus::Deleted.is_active());
        assert!(!UserStatus::Suspended.is_active());
        assert!(!UserStatus::Blocked.is_active());
    }

    #[test]
    fn test_user_status_from_str() {
        assert_eq!(UserStatus::from_str("ACTIVE").unwrap(), UserStatus::Active);
        assert_eq!(
            UserStatus::from_str("suspended").unwrap(),
            UserStatus::Suspended
        );
        assert!(UserStatus::from_str("gone").is_err());
    }
}
