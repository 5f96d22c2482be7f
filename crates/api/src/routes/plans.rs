//! Plan endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::plan::{
    CreatePlanRequest, CreatePlanResponse, KickMembersRequest, KickMembersResponse,
    ListPlansResponse, PlanDetail, UpdatePlanRequest, WithdrawPlansRequest, WithdrawPlansResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ActingUser;
use crate::middleware::metrics::record_plan_created;

/// Create a new plan owned by the caller.
///
/// POST /api/v1/plans
pub async fn create_plan(
    State(state): State<AppState>,
    user: ActingUser,
    Json(request): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<CreatePlanResponse>), ApiError> {
    request.validate()?;

    let plan = state.planner.plans.create(user.user_id, request).await?;
    record_plan_created(plan.is_public);

    Ok((StatusCode::CREATED, Json(plan)))
}

/// List plans the caller currently owns or belongs to.
///
/// GET /api/v1/plans
pub async fn list_plans(
    State(state): State<AppState>,
    user: ActingUser,
) -> Result<Json<ListPlansResponse>, ApiError> {
    Ok(Json(state.planner.plans.list(user.user_id).await?))
}

/// GET /api/v1/plans/:plan_id
pub async fn get_plan(
    State(state): State<AppState>,
    user: ActingUser,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<PlanDetail>, ApiError> {
    Ok(Json(state.planner.plans.detail(user.user_id, plan_id).await?))
}

/// Rename a plan or change its visibility.
///
/// PATCH /api/v1/plans/:plan_id
pub async fn update_plan(
    State(state): State<AppState>,
    user: ActingUser,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<UpdatePlanRequest>,
) -> Result<Json<PlanDetail>, ApiError> {
    request.validate()?;

    let plan = state
        .planner
        .plans
        .update(user.user_id, plan_id, request)
        .await?;

    Ok(Json(plan))
}

/// Soft delete a plan.
///
/// DELETE /api/v1/plans/:plan_id
pub async fn delete_plan(
    State(state): State<AppState>,
    user: ActingUser,
    Path(plan_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.planner.plans.delete(user.user_id, plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove members from a plan.
///
/// POST /api/v1/plans/:plan_id/kick
pub async fn kick_members(
    State(state): State<AppState>,
    user: ActingUser,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<KickMembersRequest>,
) -> Result<Json<KickMembersResponse>, ApiError> {
    request.validate()?;

    let kicked = state
        .planner
        .plans
        .kick(user.user_id, plan_id, &request.user_ids)
        .await?;

    Ok(Json(kicked))
}

/// Leave several plans at once.
///
/// POST /api/v1/plans/withdraw
pub async fn withdraw_plans(
    State(state): State<AppState>,
    user: ActingUser,
    Json(request): Json<WithdrawPlansRequest>,
) -> Result<Json<WithdrawPlansResponse>, ApiError> {
    request.validate()?;

    let withdrawn = state
        .planner
        .plans
        .withdraw(user.user_id, &request.plan_ids)
        .await?;

    Ok(Json(withdrawn))
}
