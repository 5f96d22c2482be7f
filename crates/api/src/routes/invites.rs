//! Invite code endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::invite::{InvitePreview, IssueInviteCodeResponse, JoinPlanResponse};
use domain::DomainError;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ActingUser;
use crate::middleware::metrics::record_invite_redeemed;

/// Trim the path segment and turn away anything no stored code could match.
fn normalize_code(code: &str) -> Result<&str, ApiError> {
    let code = code.trim();
    if shared::invite_code::fits_storage(code) {
        Ok(code)
    } else {
        Err(DomainError::CodeNotFound.into())
    }
}

/// Issue an invite code for a plan.
///
/// POST /api/v1/plans/:plan_id/invite-codes
pub async fn issue_invite_code(
    State(state): State<AppState>,
    user: ActingUser,
    Path(plan_id): Path<Uuid>,
) -> Result<(StatusCode, Json<IssueInviteCodeResponse>), ApiError> {
    let issued = state.planner.invites.issue(user.user_id, plan_id).await?;
    Ok((StatusCode::CREATED, Json(issued)))
}

/// Show which plan a code leads to.
///
/// GET /api/v1/invite-codes/:code
pub async fn preview_invite_code(
    State(state): State<AppState>,
    user: ActingUser,
    Path(code): Path<String>,
) -> Result<Json<InvitePreview>, ApiError> {
    let code = normalize_code(&code)?;

    Ok(Json(state.planner.invites.preview(user.user_id, code).await?))
}

/// Join the plan behind a code.
///
/// POST /api/v1/invite-codes/:code/join
pub async fn join_with_invite_code(
    State(state): State<AppState>,
    user: ActingUser,
    Path(code): Path<String>,
) -> Result<Json<JoinPlanResponse>, ApiError> {
    let code = normalize_code(&code)?;

    let joined = state.planner.invites.redeem(user.user_id, code).await?;
    record_invite_redeemed();

    Ok(Json(joined))
}
