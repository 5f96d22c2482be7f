//! Saved place metadata from the place catalog.

use serde::Serialize;
use uuid::Uuid;

/// A place saved to a plan, referenced by route-places through its external id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlaceInfo {
    pub pin_place_id: String,
    pub plan_id: Uuid,
    pub title: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub color: Option<String>,
}
