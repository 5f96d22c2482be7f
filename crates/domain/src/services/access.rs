//! Loading the caller, plan and membership snapshot an operation is decided on.

use uuid::Uuid;

use crate::error::DomainError;
use crate::models::membership::{MembershipSnapshot, MembershipStatus};
use crate::models::plan::Plan;
use crate::models::route::Route;
use crate::models::user::User;
use crate::store::Stores;

/// A reachable plan with the membership rows read for this operation.
#[derive(Debug, Clone)]
pub struct PlanAccess {
    pub plan: Plan,
    pub snapshot: MembershipSnapshot,
    /// Caller's status, `None` for non-members.
    pub status: Option<MembershipStatus>,
}

/// A reachable route together with its plan access.
#[derive(Debug, Clone)]
pub struct RouteAccess {
    pub route: Route,
    pub plan: PlanAccess,
}

/// The acting user, who must exist and be ACTIVE.
pub async fn require_active_user(stores: &Stores, user_id: Uuid) -> Result<User, DomainError> {
    match stores.users.find_user(user_id).await? {
        Some(user) if user.status.is_active() => Ok(user),
        _ => Err(DomainError::UserNotFound),
    }
}

/// Load a live plan and a snapshot of its memberships.
pub async fn load_plan_access(
    stores: &Stores,
    plan_id: Uuid,
    user_id: Uuid,
) -> Result<PlanAccess, DomainError> {
    let plan = stores
        .plans
        .find_plan(plan_id)
        .await?
        .filter(Plan::is_reachable)
        .ok_or(DomainError::PlanNotFound)?;

    let snapshot = MembershipSnapshot::new(stores.memberships.list_by_plan(plan_id).await?);
    let status = snapshot.status_of(user_id);

    Ok(PlanAccess {
        plan,
        snapshot,
        status,
    })
}

/// Load a live route, then its plan, which must be live too.
pub async fn load_route_access(
    stores: &Stores,
    route_id: Uuid,
    user_id: Uuid,
) -> Result<RouteAccess, DomainError> {
    let route = stores
        .routes
        .find_route(route_id)
        .await?
        .filter(|r| !r.is_deleted)
        .ok_or(DomainError::RouteNotFound)?;

    let plan = load_plan_access(stores, route.plan_id, user_id).await?;

    Ok(RouteAccess { route, plan })
}

/// Collapse duplicate ids of a batch request, keeping first-seen order.
pub fn collapse_batch(ids: &[Uuid], what: &str) -> Result<Vec<Uuid>, DomainError> {
    let mut unique: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    if unique.is_empty() {
        return Err(DomainError::invalid_operation(format!("no {} given", what)));
    }
    Ok(unique)
}
