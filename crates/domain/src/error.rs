//! Domain error types.

use thiserror::Error;

/// Message used when a route-place references a place outside the route's plan.
pub const SAVED_PLACE_NOT_FOUND: &str = "saved place not found";

/// Message used when a route-place id is unknown or outside the route.
pub const ROUTE_PLACE_NOT_FOUND: &str = "route place not found";

/// Failure reported by a storage adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(db_err.message().to_string()),
                _ => StoreError::Database(db_err.to_string()),
            },
            other => StoreError::Database(other.to_string()),
        }
    }
}

/// Error kinds surfaced by every plan, invite, route and route-place operation.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("User not found")]
    UserNotFound,

    #[error("Plan not found")]
    PlanNotFound,

    #[error("Route not found")]
    RouteNotFound,

    #[error("Not found: {0}")]
    RoutePlaceNotFound(String),

    #[error("Member not found")]
    MemberNotFound,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invite code not found")]
    CodeNotFound,

    #[error("Invite code expired")]
    CodeExpired,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DomainError {
    pub fn access_denied(msg: impl Into<String>) -> Self {
        DomainError::AccessDenied(msg.into())
    }

    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        DomainError::InvalidOperation(msg.into())
    }

    pub fn saved_place_not_found() -> Self {
        DomainError::RoutePlaceNotFound(SAVED_PLACE_NOT_FOUND.to_string())
    }

    pub fn route_place_not_found() -> Self {
        DomainError::RoutePlaceNotFound(ROUTE_PLACE_NOT_FOUND.to_string())
    }

    /// Stable machine-readable kind, used in API error bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::UserNotFound => "user_not_found",
            DomainError::PlanNotFound => "plan_not_found",
            DomainError::RouteNotFound => "route_not_found",
            DomainError::RoutePlaceNotFound(_) => "route_place_not_found",
            DomainError::MemberNotFound => "member_not_found",
            DomainError::AccessDenied(_) => "access_denied",
            DomainError::InvalidOperation(_) => "invalid_operation",
            DomainError::CodeNotFound => "code_not_found",
            DomainError::CodeExpired => "code_expired",
            DomainError::Store(_) => "internal_error",
        }
    }
}
