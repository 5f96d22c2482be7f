//! Route-place endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::route_place::{
    DeleteRoutePlacesRequest, DeleteRoutePlacesResponse, ListRoutePlacesResponse,
    RoutePlaceResponse, SaveRoutePlaceRequest, UpdateRoutePlaceRequest,
};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ActingUser;

/// Append a saved place to the end of a route.
///
/// POST /api/v1/routes/:route_id/places
pub async fn save_route_place(
    State(state): State<AppState>,
    user: ActingUser,
    Path(route_id): Path<Uuid>,
    Json(request): Json<SaveRoutePlaceRequest>,
) -> Result<(StatusCode, Json<RoutePlaceResponse>), ApiError> {
    request.validate()?;

    let saved = state
        .planner
        .route_places
        .save(user.user_id, route_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/v1/routes/:route_id/places
pub async fn list_route_places(
    State(state): State<AppState>,
    user: ActingUser,
    Path(route_id): Path<Uuid>,
) -> Result<Json<ListRoutePlacesResponse>, ApiError> {
    Ok(Json(
        state
            .planner
            .route_places
            .list(user.user_id, route_id)
            .await?,
    ))
}

/// PATCH /api/v1/route-places/:route_place_id
pub async fn update_route_place(
    State(state): State<AppState>,
    user: ActingUser,
    Path(route_place_id): Path<Uuid>,
    Json(request): Json<UpdateRoutePlaceRequest>,
) -> Result<Json<RoutePlaceResponse>, ApiError> {
    request.validate()?;

    let updated = state
        .planner
        .route_places
        .update(user.user_id, route_place_id, request)
        .await?;

    Ok(Json(updated))
}

/// Remove several places from one route.
///
/// POST /api/v1/routes/:route_id/places/delete
pub async fn delete_route_places(
    State(state): State<AppState>,
    user: ActingUser,
    Path(route_id): Path<Uuid>,
    Json(request): Json<DeleteRoutePlacesRequest>,
) -> Result<Json<DeleteRoutePlacesResponse>, ApiError> {
    request.validate()?;

    let deleted = state
        .planner
        .route_places
        .delete(user.user_id, route_id, &request.route_place_ids)
        .await?;

    Ok(Json(deleted))
}
