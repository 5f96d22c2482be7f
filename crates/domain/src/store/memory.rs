//! In-memory implementation of every storage port.
//!
//! Used by the service tests, the HTTP integration tests and local runs
//! without a database. A single lock guards the whole state, so each call is
//! atomic, and batch mutations validate every target before changing any.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use super::{
    InviteCodeStore, MembershipStore, PlaceCatalog, PlanStore, RoutePlaceStore, RouteStore,
    UserDirectory,
};
use crate::error::StoreError;
use crate::models::invite::InviteCode;
use crate::models::membership::{Membership, MembershipStatus};
use crate::models::place::PlaceInfo;
use crate::models::plan::{NewPlan, Plan};
use crate::models::route::{NewRoute, Route};
use crate::models::route_place::{next_sequence, NewRoutePlace, RoutePlace};
use crate::models::user::{User, UserStatus};

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    plans: Vec<Plan>,
    memberships: Vec<Membership>,
    invite_codes: Vec<InviteCode>,
    routes: Vec<Route>,
    route_places: Vec<RoutePlace>,
    places: Vec<PlaceInfo>,
}

/// Process-local store backing every port.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add or replace a user in the directory.
    pub fn insert_user(&self, user: User) {
        let mut state = self.lock();
        state.users.retain(|u| u.id != user.id);
        state.users.push(user);
    }

    /// Add an active user with the given nickname and return its id.
    pub fn add_active_user(&self, nickname: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.insert_user(User {
            id,
            nickname: nickname.to_string(),
            status: UserStatus::Active,
        });
        id
    }

    pub fn set_user_status(&self, user_id: Uuid, status: UserStatus) {
        let mut state = self.lock();
        if let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) {
            user.status = status;
        }
    }

    /// Add or replace a saved place in the catalog.
    pub fn insert_place(&self, place: PlaceInfo) {
        let mut state = self.lock();
        state
            .places
            .retain(|p| !(p.plan_id == place.plan_id && p.pin_place_id == place.pin_place_id));
        state.places.push(place);
    }

    pub fn remove_place(&self, plan_id: Uuid, pin_place_id: &str) {
        self.lock()
            .places
            .retain(|p| !(p.plan_id == plan_id && p.pin_place_id == pin_place_id));
    }

    /// Force a membership status, inserting the row if needed.
    ///
    /// Stands in for administrative actions such as blocking a user.
    pub fn set_membership_status(&self, plan_id: Uuid, user_id: Uuid, status: MembershipStatus) {
        let mut state = self.lock();
        let now = Utc::now();
        match state
            .memberships
            .iter_mut()
            .find(|m| m.plan_id == plan_id && m.user_id == user_id)
        {
            Some(row) => {
                row.status = status;
                row.updated_at = now;
            }
            None => state.memberships.push(Membership {
                plan_id,
                user_id,
                status,
                joined_at: now,
                updated_at: now,
            }),
        }
    }

    pub fn membership_status(&self, plan_id: Uuid, user_id: Uuid) -> Option<MembershipStatus> {
        self.lock()
            .memberships
            .iter()
            .find(|m| m.plan_id == plan_id && m.user_id == user_id)
            .map(|m| m.status)
    }

    /// Number of membership rows of a plan, in any status.
    pub fn membership_rows(&self, plan_id: Uuid) -> usize {
        self.lock()
            .memberships
            .iter()
            .filter(|m| m.plan_id == plan_id)
            .count()
    }

    /// Number of route-place rows of a route.
    pub fn route_place_rows(&self, route_id: Uuid) -> usize {
        self.lock()
            .route_places
            .iter()
            .filter(|rp| rp.route_id == route_id)
            .count()
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_users(&self, user_ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        Ok(self
            .lock()
            .users
            .iter()
            .filter(|u| user_ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PlanStore for InMemoryStore {
    async fn create_plan(&self, new_plan: NewPlan) -> Result<Plan, StoreError> {
        let now = Utc::now();
        let plan = Plan {
            id: Uuid::new_v4(),
            name: new_plan.name,
            is_public: new_plan.is_public,
            is_deleted: false,
            start_date: new_plan.start_date,
            end_date: new_plan.end_date,
            created_by: new_plan.owner_id,
            created_at: now,
            updated_at: now,
        };

        let mut state = self.lock();
        state.plans.push(plan.clone());
        state.memberships.push(Membership {
            plan_id: plan.id,
            user_id: new_plan.owner_id,
            status: MembershipStatus::Owner,
            joined_at: now,
            updated_at: now,
        });
        Ok(plan)
    }

    async fn find_plan(&self, plan_id: Uuid) -> Result<Option<Plan>, StoreError> {
        Ok(self.lock().plans.iter().find(|p| p.id == plan_id).cloned())
    }

    async fn find_plans(&self, plan_ids: &[Uuid]) -> Result<Vec<Plan>, StoreError> {
        Ok(self
            .lock()
            .plans
            .iter()
            .filter(|p| plan_ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn update_plan(
        &self,
        plan_id: Uuid,
        name: Option<&str>,
        is_public: Option<bool>,
    ) -> Result<Plan, StoreError> {
        let mut state = self.lock();
        let plan = state
            .plans
            .iter_mut()
            .find(|p| p.id == plan_id && !p.is_deleted)
            .ok_or(StoreError::NotFound)?;
        if let Some(name) = name {
            plan.name = name.to_string();
        }
        if let Some(is_public) = is_public {
            plan.is_public = is_public;
        }
        plan.updated_at = Utc::now();
        Ok(plan.clone())
    }

    async fn soft_delete_plan(&self, plan_id: Uuid) -> Result<u64, StoreError> {
        let mut state = self.lock();
        match state
            .plans
            .iter_mut()
            .find(|p| p.id == plan_id && !p.is_deleted)
        {
            Some(plan) => {
                plan.is_deleted = true;
                plan.updated_at = Utc::now();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl MembershipStore for InMemoryStore {
    async fn list_by_plan(&self, plan_id: Uuid) -> Result<Vec<Membership>, StoreError> {
        Ok(self
            .lock()
            .memberships
            .iter()
            .filter(|m| m.plan_id == plan_id)
            .cloned()
            .collect())
    }

    async fn find_by_plan_and_user(
        &self,
        plan_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError> {
        Ok(self
            .lock()
            .memberships
            .iter()
            .find(|m| m.plan_id == plan_id && m.user_id == user_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Membership>, StoreError> {
        let mut rows: Vec<Membership> = self
            .lock()
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));
        Ok(rows)
    }

    async fn upsert_member(&self, plan_id: Uuid, user_id: Uuid) -> Result<Membership, StoreError> {
        let mut state = self.lock();
        let now = Utc::now();
        if let Some(row) = state
            .memberships
            .iter_mut()
            .find(|m| m.plan_id == plan_id && m.user_id == user_id)
        {
            if matches!(
                row.status,
                MembershipStatus::Withdrawn | MembershipStatus::Kicked
            ) {
                row.status = MembershipStatus::Member;
                row.joined_at = now;
                row.updated_at = now;
            }
            return Ok(row.clone());
        }

        let row = Membership {
            plan_id,
            user_id,
            status: MembershipStatus::Member,
            joined_at: now,
            updated_at: now,
        };
        state.memberships.push(row.clone());
        Ok(row)
    }

    async fn transition_all(
        &self,
        targets: &[(Uuid, Uuid)],
        from: MembershipStatus,
        to: MembershipStatus,
    ) -> Result<u64, StoreError> {
        let mut state = self.lock();
        let all_match = targets.iter().all(|(plan_id, user_id)| {
            state
                .memberships
                .iter()
                .any(|m| m.plan_id == *plan_id && m.user_id == *user_id && m.status == from)
        });
        if !all_match {
            return Ok(0);
        }

        let now = Utc::now();
        for row in state.memberships.iter_mut() {
            if row.status == from && targets.contains(&(row.plan_id, row.user_id)) {
                row.status = to;
                row.updated_at = now;
            }
        }
        Ok(targets.len() as u64)
    }
}

#[async_trait]
impl InviteCodeStore for InMemoryStore {
    async fn create_invite_code(&self, invite: InviteCode) -> Result<InviteCode, StoreError> {
        self.lock().invite_codes.push(invite.clone());
        Ok(invite)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<InviteCode>, StoreError> {
        // Newest first, matching the unique-per-code lookup of the database.
        Ok(self
            .lock()
            .invite_codes
            .iter()
            .rev()
            .find(|i| i.code == code)
            .cloned())
    }
}

#[async_trait]
impl RouteStore for InMemoryStore {
    async fn create_route(&self, new_route: NewRoute) -> Result<Route, StoreError> {
        let now = Utc::now();
        let route = Route {
            id: Uuid::new_v4(),
            plan_id: new_route.plan_id,
            name: new_route.name,
            description: new_route.description,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        self.lock().routes.push(route.clone());
        Ok(route)
    }

    async fn find_route(&self, route_id: Uuid) -> Result<Option<Route>, StoreError> {
        Ok(self.lock().routes.iter().find(|r| r.id == route_id).cloned())
    }

    async fn list_by_plan(&self, plan_id: Uuid) -> Result<Vec<Route>, StoreError> {
        Ok(self
            .lock()
            .routes
            .iter()
            .filter(|r| r.plan_id == plan_id && !r.is_deleted)
            .cloned()
            .collect())
    }

    async fn update_route(
        &self,
        route_id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Route, StoreError> {
        let mut state = self.lock();
        let route = state
            .routes
            .iter_mut()
            .find(|r| r.id == route_id && !r.is_deleted)
            .ok_or(StoreError::NotFound)?;
        if let Some(name) = name {
            route.name = name.to_string();
        }
        if let Some(description) = description {
            route.description = Some(description.to_string());
        }
        route.updated_at = Utc::now();
        Ok(route.clone())
    }

    async fn count_live(&self, plan_id: Uuid, route_ids: &[Uuid]) -> Result<u64, StoreError> {
        Ok(self
            .lock()
            .routes
            .iter()
            .filter(|r| r.plan_id == plan_id && !r.is_deleted && route_ids.contains(&r.id))
            .count() as u64)
    }

    async fn soft_delete_routes(
        &self,
        plan_id: Uuid,
        route_ids: &[Uuid],
    ) -> Result<u64, StoreError> {
        let mut state = self.lock();
        let live = state
            .routes
            .iter()
            .filter(|r| r.plan_id == plan_id && !r.is_deleted && route_ids.contains(&r.id))
            .count();
        if live != route_ids.len() {
            return Ok(0);
        }

        let now = Utc::now();
        for route in state.routes.iter_mut() {
            if route_ids.contains(&route.id) {
                route.is_deleted = true;
                route.updated_at = now;
            }
        }
        Ok(live as u64)
    }
}

fn max_sequence(state: &State, route_id: Uuid) -> Option<i32> {
    state
        .route_places
        .iter()
        .filter(|rp| rp.route_id == route_id)
        .map(|rp| rp.sequence)
        .max()
}

#[async_trait]
impl RoutePlaceStore for InMemoryStore {
    async fn create_route_place(
        &self,
        new_route_place: NewRoutePlace,
    ) -> Result<RoutePlace, StoreError> {
        let mut state = self.lock();
        let now = Utc::now();
        let route_place = RoutePlace {
            id: Uuid::new_v4(),
            route_id: new_route_place.route_id,
            pin_place_id: new_route_place.pin_place_id,
            sequence: next_sequence(max_sequence(&state, new_route_place.route_id)),
            nickname: new_route_place.nickname,
            description: new_route_place.description,
            date: new_route_place.date,
            created_at: now,
            updated_at: now,
        };
        state.route_places.push(route_place.clone());
        Ok(route_place)
    }

    async fn find_route_place(
        &self,
        route_place_id: Uuid,
    ) -> Result<Option<RoutePlace>, StoreError> {
        Ok(self
            .lock()
            .route_places
            .iter()
            .find(|rp| rp.id == route_place_id)
            .cloned())
    }

    async fn list_by_route(&self, route_id: Uuid) -> Result<Vec<RoutePlace>, StoreError> {
        self.list_by_routes(&[route_id]).await
    }

    async fn list_by_routes(&self, route_ids: &[Uuid]) -> Result<Vec<RoutePlace>, StoreError> {
        let mut rows: Vec<RoutePlace> = self
            .lock()
            .route_places
            .iter()
            .filter(|rp| route_ids.contains(&rp.route_id))
            .cloned()
            .collect();
        rows.sort_by_key(|rp| (rp.route_id, rp.sequence));
        Ok(rows)
    }

    async fn find_max_sequence(&self, route_id: Uuid) -> Result<Option<i32>, StoreError> {
        Ok(max_sequence(&self.lock(), route_id))
    }

    async fn update_route_place(
        &self,
        route_place: &RoutePlace,
    ) -> Result<RoutePlace, StoreError> {
        let mut state = self.lock();
        let row = state
            .route_places
            .iter_mut()
            .find(|rp| rp.id == route_place.id)
            .ok_or(StoreError::NotFound)?;
        row.pin_place_id = route_place.pin_place_id.clone();
        row.sequence = route_place.sequence;
        row.nickname = route_place.nickname.clone();
        row.description = route_place.description.clone();
        row.date = route_place.date;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn count_in_route(
        &self,
        route_id: Uuid,
        route_place_ids: &[Uuid],
    ) -> Result<u64, StoreError> {
        Ok(self
            .lock()
            .route_places
            .iter()
            .filter(|rp| rp.route_id == route_id && route_place_ids.contains(&rp.id))
            .count() as u64)
    }

    async fn delete_route_places(
        &self,
        route_id: Uuid,
        route_place_ids: &[Uuid],
    ) -> Result<u64, StoreError> {
        let mut state = self.lock();
        let matching = state
            .route_places
            .iter()
            .filter(|rp| rp.route_id == route_id && route_place_ids.contains(&rp.id))
            .count();
        if matching != route_place_ids.len() {
            return Ok(0);
        }

        state
            .route_places
            .retain(|rp| !(rp.route_id == route_id && route_place_ids.contains(&rp.id)));
        Ok(matching as u64)
    }
}

#[async_trait]
impl PlaceCatalog for InMemoryStore {
    async fn find_by_external_id_and_plan(
        &self,
        pin_place_id: &str,
        plan_id: Uuid,
    ) -> Result<Option<PlaceInfo>, StoreError> {
        Ok(self
            .lock()
            .places
            .iter()
            .find(|p| p.plan_id == plan_id && p.pin_place_id == pin_place_id)
            .cloned())
    }

    async fn find_by_plan(
        &self,
        plan_id: Uuid,
        pin_place_ids: &[String],
    ) -> Result<Vec<PlaceInfo>, StoreError> {
        Ok(self
            .lock()
            .places
            .iter()
            .filter(|p| p.plan_id == plan_id && pin_place_ids.contains(&p.pin_place_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_plan(owner_id: Uuid) -> NewPlan {
        NewPlan {
            name: "Busan".to_string(),
            is_public: false,
            start_date: None,
            end_date: None,
            owner_id,
        }
    }

    #[tokio::test]
    async fn test_create_plan_inserts_owner_row() {
        let store = InMemoryStore::new();
        let owner = store.add_active_user("owner");
        let plan = store.create_plan(new_plan(owner)).await.unwrap();

        assert_eq!(
            store.membership_status(plan.id, owner),
            Some(MembershipStatus::Owner)
        );
        assert_eq!(store.membership_rows(plan.id), 1);
    }

    #[tokio::test]
    async fn test_transition_all_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let owner = store.add_active_user("owner");
        let plan = store.create_plan(new_plan(owner)).await.unwrap();
        let a = store.add_active_user("a");
        let b = store.add_active_user("b");
        store.set_membership_status(plan.id, a, MembershipStatus::Member);
        store.set_membership_status(plan.id, b, MembershipStatus::Withdrawn);

        let changed = store
            .transition_all(
                &[(plan.id, a), (plan.id, b)],
                MembershipStatus::Member,
                MembershipStatus::Kicked,
            )
            .await
            .unwrap();
        assert_eq!(changed, 0);
        assert_eq!(
            store.membership_status(plan.id, a),
            Some(MembershipStatus::Member)
        );

        let changed = store
            .transition_all(
                &[(plan.id, a)],
                MembershipStatus::Member,
                MembershipStatus::Kicked,
            )
            .await
            .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(
            store.membership_status(plan.id, a),
            Some(MembershipStatus::Kicked)
        );
    }

    #[tokio::test]
    async fn test_upsert_member_never_downgrades() {
        let store = InMemoryStore::new();
        let owner = store.add_active_user("owner");
        let plan = store.create_plan(new_plan(owner)).await.unwrap();

        let row = store.upsert_member(plan.id, owner).await.unwrap();
        assert_eq!(row.status, MembershipStatus::Owner);

        let blocked = store.add_active_user("blocked");
        store.set_membership_status(plan.id, blocked, MembershipStatus::Blocked);
        let row = store.upsert_member(plan.id, blocked).await.unwrap();
        assert_eq!(row.status, MembershipStatus::Blocked);
        assert_eq!(store.membership_rows(plan.id), 2);
    }

    #[tokio::test]
    async fn test_delete_route_places_rejects_foreign_ids() {
        let store = InMemoryStore::new();
        let route_id = Uuid::new_v4();
        let rp = store
            .create_route_place(NewRoutePlace {
                route_id,
                pin_place_id: "p1".to_string(),
                nickname: None,
                description: None,
                date: None,
            })
            .await
            .unwrap();

        let deleted = store
            .delete_route_places(route_id, &[rp.id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(deleted, 0);
        assert_eq!(store.route_place_rows(route_id), 1);

        let deleted = store.delete_route_places(route_id, &[rp.id]).await.unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(store.route_place_rows(route_id), 0);
    }

    fn new_route_place(route_id: Uuid, pin_place_id: &str) -> NewRoutePlace {
        NewRoutePlace {
            route_id,
            pin_place_id: pin_place_id.to_string(),
            nickname: None,
            description: None,
            date: None,
        }
    }

    #[tokio::test]
    async fn test_concurrent_appends_get_distinct_sequences() {
        let store = Arc::new(InMemoryStore::new());
        let route_id = Uuid::new_v4();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .create_route_place(new_route_place(route_id, &format!("p{i}")))
                        .await
                        .unwrap()
                        .sequence
                })
            })
            .collect();

        let mut sequences = Vec::new();
        for handle in handles {
            sequences.push(handle.await.unwrap());
        }
        sequences.sort();
        assert_eq!(sequences, (1..=8).collect::<Vec<i32>>());
        assert_eq!(store.find_max_sequence(route_id).await.unwrap(), Some(8));
    }

    #[tokio::test]
    async fn test_append_follows_max_of_its_own_route() {
        let store = InMemoryStore::new();
        let route_id = Uuid::new_v4();
        let other_route = Uuid::new_v4();
        store
            .create_route_place(new_route_place(other_route, "x"))
            .await
            .unwrap();

        let mut first = store
            .create_route_place(new_route_place(route_id, "p1"))
            .await
            .unwrap();
        assert_eq!(first.sequence, 1);

        first.sequence = 5;
        store.update_route_place(&first).await.unwrap();
        let next = store
            .create_route_place(new_route_place(route_id, "p2"))
            .await
            .unwrap();
        assert_eq!(next.sequence, 6);
    }
}
