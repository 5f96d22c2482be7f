//! Route endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::route::{
    CreateRouteRequest, DeleteRoutesRequest, DeleteRoutesResponse, ListRoutesResponse,
    RouteResponse, UpdateRouteRequest,
};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ActingUser;

/// POST /api/v1/plans/:plan_id/routes
pub async fn create_route(
    State(state): State<AppState>,
    user: ActingUser,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<(StatusCode, Json<RouteResponse>), ApiError> {
    request.validate()?;

    let route = state
        .planner
        .routes
        .create(user.user_id, plan_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(route)))
}

/// List routes of a plan with their places.
///
/// GET /api/v1/plans/:plan_id/routes
pub async fn list_routes(
    State(state): State<AppState>,
    user: ActingUser,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<ListRoutesResponse>, ApiError> {
    Ok(Json(state.planner.routes.list(user.user_id, plan_id).await?))
}

/// PATCH /api/v1/routes/:route_id
pub async fn update_route(
    State(state): State<AppState>,
    user: ActingUser,
    Path(route_id): Path<Uuid>,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    request.validate()?;

    let route = state
        .planner
        .routes
        .update(user.user_id, route_id, request)
        .await?;

    Ok(Json(route))
}

/// Delete several routes of one plan.
///
/// POST /api/v1/plans/:plan_id/routes/delete
pub async fn delete_routes(
    State(state): State<AppState>,
    user: ActingUser,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<DeleteRoutesRequest>,
) -> Result<Json<DeleteRoutesResponse>, ApiError> {
    request.validate()?;

    let deleted = state
        .planner
        .routes
        .delete(user.user_id, plan_id, &request.route_ids)
        .await?;

    Ok(Json(deleted))
}
