//! Routes of a plan.

use std::collections::HashMap;
use uuid::Uuid;

use super::access::{
    collapse_batch, load_plan_access, load_route_access, require_active_user, PlanAccess,
};
use super::authorization::{can_read_routes, can_write_routes};
use super::route_place::project_route_places;
use crate::error::DomainError;
use crate::models::route::{
    CreateRouteRequest, DeleteRoutesResponse, ListRoutesResponse, NewRoute, Route,
    RouteResponse, UpdateRouteRequest,
};
use crate::models::route_place::RoutePlaceResponse;
use crate::store::Stores;

#[derive(Clone)]
pub struct RouteService {
    stores: Stores,
}

impl RouteService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        request: CreateRouteRequest,
    ) -> Result<RouteResponse, DomainError> {
        require_active_user(&self.stores, user_id).await?;
        self.writable_plan(plan_id, user_id).await?;

        let route = self
            .stores
            .routes
            .create_route(NewRoute {
                plan_id,
                name: request.name.trim().to_string(),
                description: request.description,
            })
            .await?;

        tracing::info!(plan_id = %plan_id, route_id = %route.id, user_id = %user_id, "Route created");

        Ok(route_response(route, Vec::new()))
    }

    /// Live routes of a plan, oldest first, each with its places in order.
    pub async fn list(&self, user_id: Uuid, plan_id: Uuid) -> Result<ListRoutesResponse, DomainError> {
        require_active_user(&self.stores, user_id).await?;
        let access = load_plan_access(&self.stores, plan_id, user_id).await?;

        if !can_read_routes(access.plan.is_public, access.status) {
            return Err(DomainError::access_denied("no permission to view routes"));
        }

        let routes = self.stores.routes.list_by_plan(plan_id).await?;
        let route_ids: Vec<Uuid> = routes.iter().map(|r| r.id).collect();
        let rows = self.stores.route_places.list_by_routes(&route_ids).await?;

        let mut by_route: HashMap<Uuid, Vec<RoutePlaceResponse>> = HashMap::new();
        for place in project_route_places(&self.stores, plan_id, rows).await? {
            by_route.entry(place.route_id).or_default().push(place);
        }

        let data = routes
            .into_iter()
            .map(|route| {
                let places = by_route.remove(&route.id).unwrap_or_default();
                route_response(route, places)
            })
            .collect();

        Ok(ListRoutesResponse { plan_id, data })
    }

    /// Rename a route or change its description.
    pub async fn update(
        &self,
        user_id: Uuid,
        route_id: Uuid,
        request: UpdateRouteRequest,
    ) -> Result<RouteResponse, DomainError> {
        require_active_user(&self.stores, user_id).await?;
        let access = load_route_access(&self.stores, route_id, user_id).await?;

        if !can_write_routes(access.plan.status) {
            return Err(DomainError::access_denied("only plan members can edit routes"));
        }

        let current = &access.route;
        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| *name != current.name);
        let description = request
            .description
            .as_deref()
            .filter(|description| Some(*description) != current.description.as_deref());

        let route = if name.is_none() && description.is_none() {
            access.route
        } else {
            let route = self
                .stores
                .routes
                .update_route(route_id, name, description)
                .await?;
            tracing::info!(route_id = %route_id, user_id = %user_id, "Route updated");
            route
        };

        let rows = self.stores.route_places.list_by_route(route_id).await?;
        let places = project_route_places(&self.stores, route.plan_id, rows).await?;

        Ok(route_response(route, places))
    }

    /// Soft delete routes of one plan. All of them or none.
    pub async fn delete(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        route_ids: &[Uuid],
    ) -> Result<DeleteRoutesResponse, DomainError> {
        require_active_user(&self.stores, user_id).await?;
        let ids = collapse_batch(route_ids, "routes")?;
        self.writable_plan(plan_id, user_id).await?;

        let expected = ids.len() as u64;
        if self.stores.routes.count_live(plan_id, &ids).await? != expected {
            return Err(DomainError::RouteNotFound);
        }
        if self.stores.routes.soft_delete_routes(plan_id, &ids).await? != expected {
            return Err(DomainError::RouteNotFound);
        }

        tracing::info!(
            plan_id = %plan_id,
            user_id = %user_id,
            deleted = ids.len(),
            "Routes deleted"
        );

        Ok(DeleteRoutesResponse {
            plan_id,
            deleted: ids,
        })
    }

    async fn writable_plan(&self, plan_id: Uuid, user_id: Uuid) -> Result<PlanAccess, DomainError> {
        let access = load_plan_access(&self.stores, plan_id, user_id).await?;
        if !can_write_routes(access.status) {
            return Err(DomainError::access_denied("only plan members can edit routes"));
        }
        Ok(access)
    }
}

fn route_response(route: Route, places: Vec<RoutePlaceResponse>) -> RouteResponse {
    RouteResponse {
        id: route.id,
        plan_id: route.plan_id,
        name: route.name,
        description: route.description,
        created_at: route.created_at,
        places,
    }
}
