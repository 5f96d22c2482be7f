//! Places on a route: saving, listing, editing and removing them.

use std::collections::HashMap;
use uuid::Uuid;

use super::access::{collapse_batch, load_route_access, require_active_user, RouteAccess};
use super::authorization::{can_read_routes, can_write_routes};
use crate::error::DomainError;
use crate::models::place::PlaceInfo;
use crate::models::route_place::{
    DeleteRoutePlacesResponse, ListRoutePlacesResponse, NewRoutePlace,
    RoutePlace, RoutePlaceResponse, SaveRoutePlaceRequest, UpdateRoutePlaceRequest,
};
use crate::store::Stores;

#[derive(Clone)]
pub struct RoutePlaceService {
    stores: Stores,
}

impl RoutePlaceService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Append a saved place of the route's plan to the end of the route.
    pub async fn save(
        &self,
        user_id: Uuid,
        route_id: Uuid,
        request: SaveRoutePlaceRequest,
    ) -> Result<RoutePlaceResponse, DomainError> {
        require_active_user(&self.stores, user_id).await?;
        let access = self.writable_route(route_id, user_id).await?;
        let plan_id = access.plan.plan.id;

        let place = self
            .stores
            .places
            .find_by_external_id_and_plan(&request.pin_place_id, plan_id)
            .await?
            .ok_or_else(DomainError::saved_place_not_found)?;

        let route_place = self
            .stores
            .route_places
            .create_route_place(NewRoutePlace {
                route_id,
                pin_place_id: request.pin_place_id,
                nickname: request.nickname,
                description: request.description,
                date: request.date,
            })
            .await?;

        tracing::info!(
            route_id = %route_id,
            route_place_id = %route_place.id,
            user_id = %user_id,
            sequence = route_place.sequence,
            "Place saved to route"
        );

        Ok(RoutePlaceResponse::project(route_place, Some(&place)))
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        route_id: Uuid,
    ) -> Result<ListRoutePlacesResponse, DomainError> {
        require_active_user(&self.stores, user_id).await?;
        let access = load_route_access(&self.stores, route_id, user_id).await?;

        if !can_read_routes(access.plan.plan.is_public, access.plan.status) {
            return Err(DomainError::access_denied("no permission to view this route"));
        }

        let rows = self.stores.route_places.list_by_route(route_id).await?;
        let data = project_route_places(&self.stores, access.plan.plan.id, rows).await?;

        Ok(ListRoutePlacesResponse { route_id, data })
    }

    /// Apply a partial update; nothing is written when no field changes.
    pub async fn update(
        &self,
        user_id: Uuid,
        route_place_id: Uuid,
        request: UpdateRoutePlaceRequest,
    ) -> Result<RoutePlaceResponse, DomainError> {
        require_active_user(&self.stores, user_id).await?;
        let mut route_place = self
            .stores
            .route_places
            .find_route_place(route_place_id)
            .await?
            .ok_or_else(DomainError::route_place_not_found)?;
        let access = self.writable_route(route_place.route_id, user_id).await?;
        let plan_id = access.plan.plan.id;

        if let Some(pin_place_id) = &request.pin_place_id {
            if *pin_place_id != route_place.pin_place_id {
                self.stores
                    .places
                    .find_by_external_id_and_plan(pin_place_id, plan_id)
                    .await?
                    .ok_or_else(DomainError::saved_place_not_found)?;
            }
        }

        if route_place.apply(&request) {
            route_place = self
                .stores
                .route_places
                .update_route_place(&route_place)
                .await?;
            tracing::info!(
                route_place_id = %route_place_id,
                user_id = %user_id,
                "Route place updated"
            );
        }

        let place = self
            .stores
            .places
            .find_by_external_id_and_plan(&route_place.pin_place_id, plan_id)
            .await?;

        Ok(RoutePlaceResponse::project(route_place, place.as_ref()))
    }

    /// Delete places of one route. All of them or none.
    pub async fn delete(
        &self,
        user_id: Uuid,
        route_id: Uuid,
        route_place_ids: &[Uuid],
    ) -> Result<DeleteRoutePlacesResponse, DomainError> {
        require_active_user(&self.stores, user_id).await?;
        let ids = collapse_batch(route_place_ids, "route places")?;
        self.writable_route(route_id, user_id).await?;

        let expected = ids.len() as u64;
        if self.stores.route_places.count_in_route(route_id, &ids).await? != expected {
            return Err(DomainError::route_place_not_found());
        }
        if self
            .stores
            .route_places
            .delete_route_places(route_id, &ids)
            .await?
            != expected
        {
            return Err(DomainError::route_place_not_found());
        }

        tracing::info!(
            route_id = %route_id,
            user_id = %user_id,
            deleted = ids.len(),
            "Route places deleted"
        );

        Ok(DeleteRoutePlacesResponse {
            route_id,
            deleted: ids,
        })
    }

    async fn writable_route(
        &self,
        route_id: Uuid,
        user_id: Uuid,
    ) -> Result<RouteAccess, DomainError> {
        let access = load_route_access(&self.stores, route_id, user_id).await?;
        if !can_write_routes(access.plan.status) {
            return Err(DomainError::access_denied("only plan members can edit routes"));
        }
        Ok(access)
    }
}

/// Merge route-places with the saved places of their plan.
pub(crate) async fn project_route_places(
    stores: &Stores,
    plan_id: Uuid,
    rows: Vec<RoutePlace>,
) -> Result<Vec<RoutePlaceResponse>, DomainError> {
    let mut pin_place_ids: Vec<String> = rows.iter().map(|rp| rp.pin_place_id.clone()).collect();
    pin_place_ids.sort();
    pin_place_ids.dedup();

    let places: HashMap<String, PlaceInfo> = stores
        .places
        .find_by_plan(plan_id, &pin_place_ids)
        .await?
        .into_iter()
        .map(|p| (p.pin_place_id.clone(), p))
        .collect();

    Ok(rows
        .into_iter()
        .map(|rp| {
            let place = places.get(&rp.pin_place_id);
            RoutePlaceResponse::project(rp, place)
        })
        .collect())
}
