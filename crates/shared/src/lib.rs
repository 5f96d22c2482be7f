//! Shared utilities for the Trip Planner backend.
//!
//! This crate provides small building blocks used by the other crates:
//! - Invite code generation
//! - Custom validation rules for request payloads

pub mod invite_code;
pub mod validation;
