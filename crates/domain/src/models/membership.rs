//! Plan membership models and the membership state machine.
//!
//! A membership row exists per (plan, user) pair and is never deleted; its
//! status records history. A user without a row is a non-member, which is
//! represented as `None` rather than as a status value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Status of a user's membership in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipStatus {
    Owner,
    Member,
    Withdrawn,
    Kicked,
    Blocked,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Owner => "owner",
            MembershipStatus::Member => "member",
            MembershipStatus::Withdrawn => "withdrawn",
            MembershipStatus::Kicked => "kicked",
            MembershipStatus::Blocked => "blocked",
        }
    }

    /// Returns true for owners and members, the statuses with full membership.
    pub fn is_current(&self) -> bool {
        matches!(self, MembershipStatus::Owner | MembershipStatus::Member)
    }
}

impl FromStr for MembershipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(MembershipStatus::Owner),
            "member" => Ok(MembershipStatus::Member),
            "withdrawn" => Ok(MembershipStatus::Withdrawn),
            "kicked" => Ok(MembershipStatus::Kicked),
            "blocked" => Ok(MembershipStatus::Blocked),
            _ => Err(format!("Invalid membership status: {}", s)),
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's membership row in a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Membership {
    pub plan_id: Uuid,
    pub user_id: Uuid,
    pub status: MembershipStatus,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read-once view of every membership row of a single plan.
///
/// Authorization decisions for one operation are made against one snapshot;
/// nothing re-reads membership mid-operation.
#[derive(Debug, Clone, Default)]
pub struct MembershipSnapshot {
    rows: Vec<Membership>,
}

impl MembershipSnapshot {
    pub fn new(rows: Vec<Membership>) -> Self {
        Self { rows }
    }

    /// Status of `user_id`, or `None` if the user has no row.
    pub fn status_of(&self, user_id: Uuid) -> Option<MembershipStatus> {
        self.rows
            .iter()
            .find(|m| m.user_id == user_id)
            .map(|m| m.status)
    }

    pub fn owner(&self) -> Option<&Membership> {
        self.rows
            .iter()
            .find(|m| m.status == MembershipStatus::Owner)
    }

    /// Rows with status MEMBER, in join order.
    pub fn members(&self) -> Vec<&Membership> {
        let mut members: Vec<&Membership> = self
            .rows
            .iter()
            .filter(|m| m.status == MembershipStatus::Member)
            .collect();
        members.sort_by_key(|m| m.joined_at);
        members
    }

    /// Number of owners and members.
    pub fn current_count(&self) -> usize {
        self.rows.iter().filter(|m| m.status.is_current()).count()
    }

    pub fn rows(&self) -> &[Membership] {
        &self.rows
    }
}

/// How a successful invite-code redemption affects the caller's row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// No row yet; insert a MEMBER row.
    Insert,
    /// WITHDRAWN or KICKED; update the row back to MEMBER.
    Rejoin { previous: MembershipStatus },
    /// Already OWNER or MEMBER; nothing changes.
    AlreadyJoined { current: MembershipStatus },
}

/// A transition the state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("blocked users cannot join")]
    Blocked,

    #[error("cannot withdraw while owning a plan")]
    OwnerCannotWithdraw,

    #[error("no active membership")]
    NotMember,
}

/// Join via invite code: {absent, WITHDRAWN, KICKED} -> MEMBER.
pub fn join_transition(current: Option<MembershipStatus>) -> Result<JoinOutcome, TransitionError> {
    match current {
        None => Ok(JoinOutcome::Insert),
        Some(previous @ (MembershipStatus::Withdrawn | MembershipStatus::Kicked)) => {
            Ok(JoinOutcome::Rejoin { previous })
        }
        Some(current @ (MembershipStatus::Owner | MembershipStatus::Member)) => {
            Ok(JoinOutcome::AlreadyJoined { current })
        }
        Some(MembershipStatus::Blocked) => Err(TransitionError::Blocked),
    }
}

/// Self-initiated withdrawal: MEMBER -> WITHDRAWN.
pub fn withdraw_transition(
    current: Option<MembershipStatus>,
) -> Result<MembershipStatus, TransitionError> {
    match current {
        Some(MembershipStatus::Member) => Ok(MembershipStatus::Withdrawn),
        Some(MembershipStatus::Owner) => Err(TransitionError::OwnerCannotWithdraw),
        _ => Err(TransitionError::NotMember),
    }
}

/// Owner-initiated removal: MEMBER -> KICKED.
pub fn kick_transition(
    current: Option<MembershipStatus>,
) -> Result<MembershipStatus, TransitionError> {
    match current {
        Some(MembershipStatus::Member) => Ok(MembershipStatus::Kicked),
        _ => Err(TransitionError::NotMember),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MembershipStatus::*;

    fn row(user_id: Uuid, status: MembershipStatus, joined_secs: i64) -> Membership {
        let at = DateTime::from_timestamp(joined_secs, 0).unwrap();
        Membership {
            plan_id: Uuid::nil(),
            user_id,
            status,
            joined_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_membership_status_as_str() {
        assert_eq!(Owner.as_str(), "owner");
        assert_eq!(Member.as_str(), "member");
        assert_eq!(Withdrawn.as_str(), "withdrawn");
        assert_eq!(Kicked.as_str(), "kicked");
        assert_eq!(Blocked.as_str(), "blocked");
    }

    #[test]
    fn test_membership_status_from_str() {
        assert_eq!(MembershipStatus::from_str("OWNER").unwrap(), Owner);
        assert_eq!(MembershipStatus::from_str("kicked").unwrap(), Kicked);
        assert!(MembershipStatus::from_str("admin").is_err());
    }

    #[test]
    fn test_membership_status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Withdrawn).unwrap(), "\"WITHDRAWN\"");
    }

    #[test]
    fn test_join_transition() {
        assert_eq!(join_transition(None), Ok(JoinOutcome::Insert));
        assert_eq!(
            join_transition(Some(Withdrawn)),
            Ok(JoinOutcome::Rejoin { previous: Withdrawn })
        );
        assert_eq!(
            join_transition(Some(Kicked)),
            Ok(JoinOutcome::Rejoin { previous: Kicked })
        );
        assert_eq!(
            join_transition(Some(Member)),
            Ok(JoinOutcome::AlreadyJoined { current: Member })
        );
        assert_eq!(
            join_transition(Some(Owner)),
            Ok(JoinOutcome::AlreadyJoined { current: Owner })
        );
        assert_eq!(join_transition(Some(Blocked)), Err(TransitionError::Blocked));
    }

    #[test]
    fn test_withdraw_transition() {
        assert_eq!(withdraw_transition(Some(Member)), Ok(Withdrawn));
        assert_eq!(
            withdraw_transition(Some(Owner)),
            Err(TransitionError::OwnerCannotWithdraw)
        );
        for status in [None, Some(Withdrawn), Some(Kicked), Some(Blocked)] {
            assert_eq!(withdraw_transition(status), Err(TransitionError::NotMember));
        }
    }

    #[test]
    fn test_kick_transition() {
        assert_eq!(kick_transition(Some(Member)), Ok(Kicked));
        for status in [None, Some(Owner), Some(Withdrawn), Some(Kicked), Some(Blocked)] {
            assert_eq!(kick_transition(status), Err(TransitionError::NotMember));
        }
    }

    #[test]
    fn test_no_transition_produces_owner() {
        let all = [None, Some(Owner), Some(Member), Some(Withdrawn), Some(Kicked), Some(Blocked)];
        for status in all {
            assert_ne!(withdraw_transition(status).ok(), Some(Owner));
            assert_ne!(kick_transition(status).ok(), Some(Owner));
            assert!(!matches!(
                join_transition(status),
                Ok(JoinOutcome::Rejoin { previous: Owner })
            ));
        }
    }

    #[test]
    fn test_snapshot_queries() {
        let owner = Uuid::new_v4();
        let early = Uuid::new_v4();
        let late = Uuid::new_v4();
        let gone = Uuid::new_v4();
        let snapshot = MembershipSnapshot::new(vec![
            row(late, Member, 300),
            row(owner, Owner, 100),
            row(gone, Withdrawn, 150),
            row(early, Member, 200),
        ]);

        assert_eq!(snapshot.status_of(owner), Some(Owner));
        assert_eq!(snapshot.status_of(gone), Some(Withdrawn));
        assert_eq!(snapshot.status_of(Uuid::new_v4()), None);
        assert_eq!(snapshot.owner().map(|m| m.user_id), Some(owner));
        let members: Vec<Uuid> = snapshot.members().iter().map(|m| m.user_id).collect();
        assert_eq!(members, vec![early, late]);
        assert_eq!(snapshot.current_count(), 3);
    }
}
