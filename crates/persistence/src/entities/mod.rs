//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod invite_code;
pub mod membership;
pub mod place;
pub mod plan;
pub mod route;
pub mod route_place;
pub mod user;

pub use invite_code::InviteCodeEntity;
pub use membership::{MembershipEntity, MembershipStatusDb};
pub use place::PlaceEntity;
pub use plan::PlanEntity;
pub use route::RouteEntity;
pub use route_place::RoutePlaceEntity;
pub use user::{UserEntity, UserStatusDb};
