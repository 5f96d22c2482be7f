//! Route-place domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::place::PlaceInfo;

/// A stop on a route, pointing at a saved place of the route's plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RoutePlace {
    pub id: Uuid,
    pub route_id: Uuid,
    pub pin_place_id: String,
    pub sequence: i32,
    pub nickname: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoutePlace {
    /// Applies the supplied fields of `changes`.
    ///
    /// Returns true if at least one field actually changed; re-submitting the
    /// current values is a no-op.
    pub fn apply(&mut self, changes: &UpdateRoutePlaceRequest) -> bool {
        let mut changed = false;
        if let Some(pin_place_id) = &changes.pin_place_id {
            changed |= replace_if_changed(&mut self.pin_place_id, pin_place_id.clone());
        }
        if let Some(description) = &changes.description {
            changed |= replace_if_changed(&mut self.description, Some(description.clone()));
        }
        if let Some(nickname) = &changes.nickname {
            changed |= replace_if_changed(&mut self.nickname, Some(nickname.clone()));
        }
        if let Some(sequence) = changes.sequence {
            changed |= replace_if_changed(&mut self.sequence, sequence);
        }
        if let Some(date) = changes.date {
            changed |= replace_if_changed(&mut self.date, Some(date));
        }
        changed
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

/// Sequence for the next route-place given the current maximum.
pub fn next_sequence(current_max: Option<i32>) -> i32 {
    current_max.map_or(1, |max| max + 1)
}

/// Input for appending a route-place.
///
/// The store assigns the sequence from the route's current maximum in the
/// same atomic step as the insert.
#[derive(Debug, Clone)]
pub struct NewRoutePlace {
    pub route_id: Uuid,
    pub pin_place_id: String,
    pub nickname: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Request payload for saving a place onto a route.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SaveRoutePlaceRequest {
    #[validate(length(min = 1, max = 64, message = "pin_place_id must be 1 to 64 characters"))]
    pub pin_place_id: String,

    #[validate(length(min = 2, max = 20, message = "Nickname must be between 2 and 20 characters"))]
    pub nickname: Option<String>,

    #[validate(length(
        min = 2,
        max = 50,
        message = "Description must be between 2 and 50 characters"
    ))]
    pub description: Option<String>,

    pub date: Option<NaiveDate>,
}

/// Request payload for updating a route-place. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateRoutePlaceRequest {
    #[validate(length(min = 1, max = 64, message = "pin_place_id must be 1 to 64 characters"))]
    pub pin_place_id: Option<String>,

    #[validate(length(
        min = 2,
        max = 50,
        message = "Description must be between 2 and 50 characters"
    ))]
    pub description: Option<String>,

    #[validate(length(min = 2, max = 20, message = "Nickname must be between 2 and 20 characters"))]
    pub nickname: Option<String>,

    #[validate(range(min = 1, message = "Sequence starts at 1"))]
    pub sequence: Option<i32>,

    pub date: Option<NaiveDate>,
}

/// Request to delete several route-places of one route.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct DeleteRoutePlacesRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "route_place_ids must contain 1 to 100 ids"
    ))]
    pub route_place_ids: Vec<Uuid>,
}

/// Route-place as returned to clients, merged with its saved place.
///
/// When the saved place no longer exists, `is_pin_place_deleted` is set and
/// the place-derived fields are null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RoutePlaceResponse {
    pub id: Uuid,
    pub route_id: Uuid,
    pub pin_place_id: String,
    pub sequence: i32,
    pub nickname: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub is_pin_place_deleted: bool,
    pub title: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub color: Option<String>,
}

impl RoutePlaceResponse {
    pub fn project(route_place: RoutePlace, place: Option<&PlaceInfo>) -> Self {
        Self {
            id: route_place.id,
            route_id: route_place.route_id,
            pin_place_id: route_place.pin_place_id,
            sequence: route_place.sequence,
            nickname: route_place.nickname,
            description: route_place.description,
            date: route_place.date,
            is_pin_place_deleted: place.is_none(),
            title: place.map(|p| p.title.clone()),
            address: place.and_then(|p| p.address.clone()),
            latitude: place.map(|p| p.latitude),
            longitude: place.map(|p| p.longitude),
            color: place.and_then(|p| p.color.clone()),
        }
    }
}

/// Response for listing the places of a route.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListRoutePlacesResponse {
    pub route_id: Uuid,
    pub data: Vec<RoutePlaceResponse>,
}

/// Response after deleting route-places.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DeleteRoutePlacesResponse {
    pub route_id: Uuid,
    pub deleted: Vec<Uuid>,
}
