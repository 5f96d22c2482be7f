//! Repository implementations for database operations.
//!
//! Each repository implements one of the domain storage ports.

pub mod invite_code;
pub mod membership;
pub mod place;
pub mod plan;
pub mod route;
pub mod route_place;
pub mod user;

pub use invite_code::InviteCodeRepository;
pub use membership::MembershipRepository;
pub use place::PlaceRepository;
pub use plan::PlanRepository;
pub use route::RouteRepository;
pub use route_place::RoutePlaceRepository;
pub use user::UserRepository;

use domain::store::Stores;
use sqlx::PgPool;
use std::sync::Arc;

/// Back every domain port with its PostgreSQL repository.
pub fn pg_stores(pool: PgPool) -> Stores {
    Stores {
        users: Arc::new(UserRepository::new(pool.clone())),
        plans: Arc::new(PlanRepository::new(pool.clone())),
        memberships: Arc::new(MembershipRepository::new(pool.clone())),
        invite_codes: Arc::new(InviteCodeRepository::new(pool.clone())),
        routes: Arc::new(RouteRepository::new(pool.clone())),
        route_places: Arc::new(RoutePlaceRepository::new(pool.clone())),
        places: Arc::new(PlaceRepository::new(pool)),
    }
}
