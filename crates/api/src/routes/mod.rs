//! HTTP route handlers.

pub mod health;
pub mod invites;
pub mod plans;
pub mod route_places;
pub mod routes;
