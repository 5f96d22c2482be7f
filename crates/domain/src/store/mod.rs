//! Storage ports consumed by the domain services.
//!
//! Each trait is implemented by the PostgreSQL repositories in the
//! `persistence` crate and by [`InMemoryStore`] for tests and local runs.
//! Batch mutations are all-or-nothing: an implementation either changes every
//! requested row and reports that count, or changes nothing and reports 0.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::invite::InviteCode;
use crate::models::membership::{Membership, MembershipStatus};
use crate::models::place::PlaceInfo;
use crate::models::plan::{NewPlan, Plan};
use crate::models::route::{NewRoute, Route};
use crate::models::route_place::{NewRoutePlace, RoutePlace};
use crate::models::user::User;

pub mod memory;

pub use memory::InMemoryStore;

/// Read access to the user directory.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user in any status.
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, StoreError>;

    /// Find several users; unknown ids are skipped.
    async fn find_users(&self, user_ids: &[Uuid]) -> Result<Vec<User>, StoreError>;
}

#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Insert a plan and its OWNER membership in one transaction.
    async fn create_plan(&self, new_plan: NewPlan) -> Result<Plan, StoreError>;

    /// Find a plan, soft-deleted or not.
    async fn find_plan(&self, plan_id: Uuid) -> Result<Option<Plan>, StoreError>;

    /// Find several plans, soft-deleted or not; unknown ids are skipped.
    async fn find_plans(&self, plan_ids: &[Uuid]) -> Result<Vec<Plan>, StoreError>;

    /// Apply the supplied fields to a live plan.
    async fn update_plan(
        &self,
        plan_id: Uuid,
        name: Option<&str>,
        is_public: Option<bool>,
    ) -> Result<Plan, StoreError>;

    /// Soft delete a plan. Returns the number of rows changed.
    async fn soft_delete_plan(&self, plan_id: Uuid) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Every membership row of a plan.
    async fn list_by_plan(&self, plan_id: Uuid) -> Result<Vec<Membership>, StoreError>;

    async fn find_by_plan_and_user(
        &self,
        plan_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError>;

    /// Every membership row of a user, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Membership>, StoreError>;

    /// Insert a MEMBER row, or turn a WITHDRAWN/KICKED row back into MEMBER.
    ///
    /// Rows in any other status are returned unchanged.
    async fn upsert_member(&self, plan_id: Uuid, user_id: Uuid) -> Result<Membership, StoreError>;

    /// Move every `(plan_id, user_id)` row currently in `from` to `to`.
    ///
    /// All-or-nothing: returns `targets.len()` on success, or 0 without any
    /// change when one of the rows is missing or not in `from`.
    async fn transition_all(
        &self,
        targets: &[(Uuid, Uuid)],
        from: MembershipStatus,
        to: MembershipStatus,
    ) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait InviteCodeStore: Send + Sync {
    async fn create_invite_code(&self, invite: InviteCode) -> Result<InviteCode, StoreError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<InviteCode>, StoreError>;
}

#[async_trait]
pub trait RouteStore: Send + Sync {
    async fn create_route(&self, new_route: NewRoute) -> Result<Route, StoreError>;

    /// Find a route, soft-deleted or not.
    async fn find_route(&self, route_id: Uuid) -> Result<Option<Route>, StoreError>;

    /// Live routes of a plan, oldest first.
    async fn list_by_plan(&self, plan_id: Uuid) -> Result<Vec<Route>, StoreError>;

    /// Apply the supplied fields to a live route.
    async fn update_route(
        &self,
        route_id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Route, StoreError>;

    /// Number of live routes of `plan_id` among `route_ids`.
    async fn count_live(&self, plan_id: Uuid, route_ids: &[Uuid]) -> Result<u64, StoreError>;

    /// Soft delete live routes of `plan_id`. All-or-nothing.
    async fn soft_delete_routes(
        &self,
        plan_id: Uuid,
        route_ids: &[Uuid],
    ) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait RoutePlaceStore: Send + Sync {
    /// Append a place to the end of its route.
    ///
    /// The sequence is one past the route's highest, or 1 on an empty route,
    /// and is read and written atomically with respect to other appends.
    async fn create_route_place(
        &self,
        new_route_place: NewRoutePlace,
    ) -> Result<RoutePlace, StoreError>;

    async fn find_route_place(
        &self,
        route_place_id: Uuid,
    ) -> Result<Option<RoutePlace>, StoreError>;

    /// Places of a route ordered by sequence.
    async fn list_by_route(&self, route_id: Uuid) -> Result<Vec<RoutePlace>, StoreError>;

    /// Places of several routes ordered by route then sequence.
    async fn list_by_routes(&self, route_ids: &[Uuid]) -> Result<Vec<RoutePlace>, StoreError>;

    /// Highest sequence used on a route, if any.
    async fn find_max_sequence(&self, route_id: Uuid) -> Result<Option<i32>, StoreError>;

    /// Persist every mutable field of `route_place`.
    async fn update_route_place(&self, route_place: &RoutePlace)
        -> Result<RoutePlace, StoreError>;

    /// Number of places of `route_id` among `route_place_ids`.
    async fn count_in_route(
        &self,
        route_id: Uuid,
        route_place_ids: &[Uuid],
    ) -> Result<u64, StoreError>;

    /// Delete places of `route_id`. All-or-nothing.
    async fn delete_route_places(
        &self,
        route_id: Uuid,
        route_place_ids: &[Uuid],
    ) -> Result<u64, StoreError>;
}

/// Read access to the saved places of plans.
#[async_trait]
pub trait PlaceCatalog: Send + Sync {
    async fn find_by_external_id_and_plan(
        &self,
        pin_place_id: &str,
        plan_id: Uuid,
    ) -> Result<Option<PlaceInfo>, StoreError>;

    /// Saved places of a plan among `pin_place_ids`; missing ones are skipped.
    async fn find_by_plan(
        &self,
        plan_id: Uuid,
        pin_place_ids: &[String],
    ) -> Result<Vec<PlaceInfo>, StoreError>;
}

/// The set of adapters a service needs.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserDirectory>,
    pub plans: Arc<dyn PlanStore>,
    pub memberships: Arc<dyn MembershipStore>,
    pub invite_codes: Arc<dyn InviteCodeStore>,
    pub routes: Arc<dyn RouteStore>,
    pub route_places: Arc<dyn RoutePlaceStore>,
    pub places: Arc<dyn PlaceCatalog>,
}

impl Stores {
    /// Back every port with the same in-memory store.
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            plans: store.clone(),
            memberships: store.clone(),
            invite_codes: store.clone(),
            routes: store.clone(),
            route_places: store.clone(),
            places: store,
        }
    }
}
