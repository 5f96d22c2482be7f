//! Domain layer for the Trip Planner backend.
//!
//! This crate contains:
//! - Domain models (Plan, Membership, InviteCode, Route, RoutePlace)
//! - The membership state machine and authorization rules
//! - Storage ports and an in-memory implementation
//! - Services orchestrating every plan, invite, route and route-place operation
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use error::{DomainError, StoreError};
