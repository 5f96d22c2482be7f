//! Invite code models for joining plans.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::membership::MembershipStatus;

/// A time-limited code that lets users join a plan.
///
/// Codes stay reusable until they expire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InviteCode {
    pub code: String,
    pub plan_id: Uuid,
    pub created_by: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl InviteCode {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Issuance settings, supplied from configuration.
#[derive(Debug, Clone)]
pub struct InviteCodeSettings {
    pub alphabet: String,
    pub length: usize,
    pub expiry: Duration,
}

impl Default for InviteCodeSettings {
    fn default() -> Self {
        Self {
            alphabet: shared::invite_code::DEFAULT_ALPHABET.to_string(),
            length: shared::invite_code::DEFAULT_LENGTH,
            expiry: Duration::hours(24),
        }
    }
}

/// Response after issuing an invite code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct IssueInviteCodeResponse {
    pub code: String,
    pub plan_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Preview of the plan behind an invite code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitePreview {
    pub plan_id: Uuid,
    pub plan_name: String,
    pub is_public: bool,
    pub member_count: usize,
    pub expires_at: DateTime<Utc>,
    pub is_valid: bool,
}

/// Response after joining a plan with an invite code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct JoinPlanResponse {
    pub plan_id: Uuid,
    pub status: MembershipStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_code_expiry_boundary() {
        let now = Utc::now();
        let invite = InviteCode {
            code: "ABCD2345".to_string(),
            plan_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            expires_at: now,
            created_at: now - Duration::days(1),
        };
        assert!(!invite.is_expired_at(now - Duration::seconds(1)));
        assert!(invite.is_expired_at(now));
        assert!(invite.is_expired_at(now + Duration::days(1)));
    }

    #[test]
    fn test_invite_code_settings_default() {
        let settings = InviteCodeSettings::default();
        assert_eq!(settings.length, 8);
        assert_eq!(settings.expiry, Duration::hours(24));
        assert!(!settings.alphabet.is_empty());
    }
}
