//! Saved place entity (database row mapping).

use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the places table.
#[derive(Debug, Clone, FromRow)]
pub struct PlaceEntity {
    pub pin_place_id: String,
    pub plan_id: Uuid,
    pub title: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub color: Option<String>,
}

impl From<PlaceEntity> for domain::models::PlaceInfo {
    fn from(entity: PlaceEntity) -> Self {
        Self {
            pin_place_id: entity.pin_place_id,
            plan_id: entity.plan_id,
            title: entity.title,
            address: entity.address,
            latitude: entity.latitude,
            longitude: entity.longitude,
            color: entity.color,
        }
    }
}
