//! Plan domain models for shared travel plans.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::membership::MembershipStatus;

/// Represents a shared travel plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Plan {
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

impl Plan {
    /// A soft-deleted plan is invisible to every operation.
    pub fn is_reachable(&self) -> bool {
        !self.is_deleted
    }
}

/// Input for creating a plan together with its owner membership.
#[derive(Debug, Clone)]
pub struct NewPlan {
    pub name: String,
    pub is_public: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub owner_id: Uuid,
}

/// Request payload for creating a plan.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
#[validate(schema(function = "validate_create_plan_dates"))]
pub struct CreatePlanRequest {
    #[validate(custom(function = "validate_plan_name"))]
    pub name: String,

    #[serde(default)]
    pub is_public: bool,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,
}

fn validate_plan_name(name: &str) -> Result<(), ValidationError> {
    shared::validation::validate_trimmed_length(name, 2, 20)
}

fn validate_create_plan_dates(request: &CreatePlanRequest) -> Result<(), ValidationError> {
    shared::validation::validate_date_range(request.start_date, request.end_date)
}

/// Request payload for updating a plan. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdatePlanRequest {
    #[validate(custom(function = "validate_plan_name"))]
    pub name: Option<String>,

    pub is_public: Option<bool>,
}

/// Request to remove members from a plan.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct KickMembersRequest {
    #[validate(length(min = 1, max = 100, message = "user_ids must contain 1 to 100 ids"))]
    pub user_ids: Vec<Uuid>,
}

/// Request to leave several plans at once.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct WithdrawPlansRequest {
    #[validate(length(min = 1, max = 100, message = "plan_ids must contain 1 to 100 ids"))]
    pub plan_ids: Vec<Uuid>,
}

/// Response for plan listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlanSummary {
    pub id: Uuid,
    pub name: String,
    pub is_public: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub your_status: MembershipStatus,
    pub joined_at: DateTime<Utc>,
}

/// Response for listing the caller's plans.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListPlansResponse {
    pub data: Vec<PlanSummary>,
    pub count: usize,
}

/// Public member info for plan responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlanMemberInfo {
    pub user_id: Uuid,
    pub nickname: Option<String>,
    pub status: MembershipStatus,
    pub joined_at: DateTime<Utc>,
}

/// Response for plan detail.
///
/// `owner` and `members` only list current membership; withdrawn, kicked and
/// blocked users appear in neither.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlanDetail {
    pub id: Uuid,
    pub name: String,
    pub is_public: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner: Option<PlanMemberInfo>,
    pub members: Vec<PlanMemberInfo>,
    pub member_count: usize,
    pub your_status: Option<MembershipStatus>,
    pub is_owner: bool,
    pub is_member: bool,
}

/// Response after creating a plan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreatePlanResponse {
    pub id: Uuid,
    pub name: String,
    pub is_public: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub your_status: MembershipStatus,
}

/// Response after kicking members.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct KickMembersResponse {
    pub plan_id: Uuid,
    pub kicked: Vec<Uuid>,
}

/// Response after withdrawing from plans.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct WithdrawPlansResponse {
    pub withdrawn: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_create_plan_request_validation() {
        let valid = CreatePlanRequest {
            name: "Jeju trip".to_string(),
            is_public: false,
            start_date: Some(date(2024, 7, 1)),
            end_date: Some(date(2024, 7, 4)),
        };
        assert!(valid.validate().is_ok());

        let short_name = CreatePlanRequest {
            name: "J".to_string(),
            ..valid.clone()
        };
        assert!(short_name.validate().is_err());

        let long_name = CreatePlanRequest {
            name: "a".repeat(21),
            ..valid.clone()
        };
        assert!(long_name.validate().is_err());

        let blank_name = CreatePlanRequest {
            name: "    ".to_string(),
            ..valid.clone()
        };
        assert!(blank_name.validate().is_err());

        let reversed = CreatePlanRequest {
            start_date: Some(date(2024, 7, 4)),
            end_date: Some(date(2024, 7, 1)),
            ..valid
        };
        assert!(reversed.validate().is_err());
    }

    #[test]
    fn test_create_plan_name_counts_characters() {
        let korean = CreatePlanRequest {
            name: "부산 여행".to_string(),
            is_public: true,
            start_date: None,
            end_date: None,
        };
        assert!(korean.validate().is_ok());
    }

    #[test]
    fn test_plan_name_length_ignores_padding() {
        let padded_short = CreatePlanRequest {
            name: " a ".to_string(),
            is_public: false,
            start_date: None,
            end_date: None,
        };
        assert!(padded_short.validate().is_err());

        let padded_full = CreatePlanRequest {
            name: format!("  {}  ", "a".repeat(20)),
            ..padded_short
        };
        assert!(padded_full.validate().is_ok());

        let rename = UpdatePlanRequest {
            name: Some(" x ".to_string()),
            is_public: None,
        };
        assert!(rename.validate().is_err());
    }

    #[test]
    fn test_update_plan_request() {
        assert!(UpdatePlanRequest::default().validate().is_ok());

        let rename = UpdatePlanRequest {
            name: Some("Seoul".to_string()),
            is_public: None,
        };
        assert!(rename.validate().is_ok());

        let bad = UpdatePlanRequest {
            name: Some("x".to_string()),
            is_public: None,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_batch_requests_reject_empty() {
        let kick = KickMembersRequest { user_ids: vec![] };
        assert!(kick.validate().is_err());

        let withdraw = WithdrawPlansRequest {
            plan_ids: vec![Uuid::new_v4()],
        };
        assert!(withdraw.validate().is_ok());
    }
}
