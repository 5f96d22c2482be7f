//! Domain models for the Trip Planner.

pub mod invite;
pub mod membership;
pub mod place;
pub mod plan;
pub mod route;
pub mod route_place;
pub mod user;

pub use invite::{InviteCode, InviteCodeSettings};
pub use membership::{Membership, MembershipSnapshot, MembershipStatus};
pub use place::PlaceInfo;
pub use plan::Plan;
pub use route::Route;
pub use route_place::RoutePlace;
pub use user::{User, UserStatus};
