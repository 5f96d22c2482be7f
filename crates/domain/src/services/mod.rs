//! Domain services for the Trip Planner.
//!
//! Every operation takes the acting user's id, loads what it needs through the
//! storage ports once, decides with the pure rules in [`authorization`], and
//! only then mutates.

pub mod access;
pub mod authorization;
pub mod invite;
pub mod plan;
pub mod route;
pub mod route_place;

#[cfg(test)]
pub(crate) mod test_support;

pub use invite::InviteCodeService;
pub use plan::PlanService;
pub use route::RouteService;
pub use route_place::RoutePlaceService;

use crate::models::invite::InviteCodeSettings;
use crate::store::Stores;

/// All domain services over one set of stores.
#[derive(Clone)]
pub struct Planner {
    pub plans: PlanService,
    pub invites: InviteCodeService,
    pub routes: RouteService,
    pub route_places: RoutePlaceService,
}

impl Planner {
    pub fn new(stores: Stores, invite_settings: InviteCodeSettings) -> Self {
        Self {
            plans: PlanService::new(stores.clone()),
            invites: InviteCodeService::new(stores.clone(), invite_settings),
            routes: RouteService::new(stores.clone()),
            route_places: RoutePlaceService::new(stores),
        }
    }
}
