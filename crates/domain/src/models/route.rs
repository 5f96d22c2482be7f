//! Route domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::plan::Plan;
use super::route_place::RoutePlaceResponse;

/// An ordered itinerary inside a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Route {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Route {
    /// A route is reachable only while it and its owning plan both exist and
    /// are not soft-deleted.
    pub fn is_reachable(&self, plan: Option<&Plan>) -> bool {
        !self.is_deleted
            && plan.is_some_and(|p| p.id == self.plan_id && p.is_reachable())
    }
}

/// Input for creating a route.
#[derive(Debug, Clone)]
pub struct NewRoute {
    pub plan_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

fn validate_route_name(name: &str) -> Result<(), ValidationError> {
    shared::validation::validate_trimmed_length(name, 2, 30)
}

/// Request payload for creating a route.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateRouteRequest {
    #[validate(custom(function = "validate_route_name"))]
    pub name: String,

    #[validate(length(
        min = 2,
        max = 50,
        message = "Description must be between 2 and 50 characters"
    ))]
    pub description: Option<String>,
}

/// Request payload for updating a route. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateRouteRequest {
    #[validate(custom(function = "validate_route_name"))]
    pub name: Option<String>,

    #[validate(length(
        min = 2,
        max = 50,
        message = "Description must be between 2 and 50 characters"
    ))]
    pub description: Option<String>,
}

/// Request to delete several routes of one plan.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct DeleteRoutesRequest {
    #[validate(length(min = 1, max = 100, message = "route_ids must contain 1 to 100 ids"))]
    pub route_ids: Vec<Uuid>,
}

/// Response for a single route, with its places ordered by sequence.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RouteResponse {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub places: Vec<RoutePlaceResponse>,
}

/// Response for listing the routes of a plan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListRoutesResponse {
    pub plan_id: Uuid,
    pub data: Vec<RouteResponse>,
}

/// Response after deleting routes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DeleteRoutesResponse {
    pub plan_id: Uuid,
    pub deleted: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(id: Uuid, is_deleted: bool) -> Plan {
        let now = Utc::now();
        Plan {
            id,
            name: "Trip".to_string(),
            is_public: false,
            is_deleted,
            start_date: None,
            end_date: None,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    fn route(plan_id: Uuid, is_deleted: bool) -> Route {
        let now = Utc::now();
        Route {
            id: Uuid::new_v4(),
            plan_id,
            name: "Day 1".to_string(),
            description: None,
            is_deleted,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_route_reachability() {
        let plan_id = Uuid::new_v4();
        let live_plan = plan(plan_id, false);
        let deleted_plan = plan(plan_id, true);

        assert!(route(plan_id, false).is_reachable(Some(&live_plan)));
        assert!(!route(plan_id, true).is_reachable(Some(&live_plan)));
        assert!(!route(plan_id, false).is_reachable(Some(&deleted_plan)));
        assert!(!route(plan_id, false).is_reachable(None));
        assert!(!route(Uuid::new_v4(), false).is_reachable(Some(&live_plan)));
    }

    #[test]
    fn test_create_route_request_validation() {
        let valid = CreateRouteRequest {
            name: "Day 1".to_string(),
            description: Some("Beach and market".to_string()),
        };
        assert!(valid.validate().is_ok());

        let no_description = CreateRouteRequest {
            name: "Day 1".to_string(),
            description: None,
        };
        assert!(no_description.validate().is_ok());

        let long_name = CreateRouteRequest {
            name: "a".repeat(31),
            description: None,
        };
        assert!(long_name.validate().is_err());

        let short_description = CreateRouteRequest {
            name: "Day 1".to_string(),
            description: Some("x".to_string()),
        };
        assert!(short_description.validate().is_err());
    }

    #[test]
    fn test_route_name_length_ignores_padding() {
        let padded = CreateRouteRequest {
            name: "  D  ".to_string(),
            description: None,
        };
        assert!(padded.validate().is_err());

        let rename = UpdateRouteRequest {
            name: Some(" D ".to_string()),
            description: None,
        };
        assert!(rename.validate().is_err());
    }
}
