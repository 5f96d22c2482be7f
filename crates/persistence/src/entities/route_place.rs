//! Route-place entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the route_places table.
#[derive(Debug, Clone, FromRow)]
pub struct RoutePlaceEntity {
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

impl From<RoutePlaceEntity> for domain::models::RoutePlace {
    fn from(entity: RoutePlaceEntity) -> Self {
        Self {
            id: entity.id,
            route_id: entity.route_id,
            pin_place_id: entity.pin_place_id,
            sequence: entity.sequence,
            nickname: entity.nickname,
            description: entity.description,
            date: entity.date,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
