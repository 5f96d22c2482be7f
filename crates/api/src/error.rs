use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Gone: {0}")]
    Gone(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String, Vec<ValidationDetail>),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Gone(msg) => (StatusCode::GONE, "gone", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Validation(msg, details) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                msg,
                Some(details),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
                None,
            ),
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UserNotFound => ApiError::Unauthorized(err.to_string()),
            DomainError::PlanNotFound
            | DomainError::RouteNotFound
            | DomainError::MemberNotFound
            | DomainError::CodeNotFound => ApiError::NotFound(err.to_string()),
            DomainError::RoutePlaceNotFound(msg) => ApiError::NotFound(msg),
            DomainError::CodeExpired => ApiError::Gone(err.to_string()),
            DomainError::AccessDenied(msg) => ApiError::Forbidden(msg),
            DomainError::InvalidOperation(msg) => ApiError::BadRequest(msg),
            DomainError::Store(store_err) => ApiError::Internal(store_err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    message: e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        let message = if details.len() == 1 {
            details[0].message.clone()
        } else {
            format!("{} validation errors", details.len())
        };

        ApiError::Validation(message, details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::StoreError;

    fn status_of(error: impl Into<ApiError>) -> StatusCode {
        error.into().into_response().status()
    }

    #[test]
    fn test_domain_error_status_mapping() {
        assert_eq!(status_of(DomainError::UserNotFound), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(DomainError::PlanNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(DomainError::RouteNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(DomainError::MemberNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(DomainError::CodeNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(DomainError::saved_place_not_found()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(DomainError::CodeExpired), StatusCode::GONE);
        assert_eq!(
            status_of(DomainError::access_denied("cannot join")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(DomainError::invalid_operation("cannot remove yourself")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::Store(StoreError::Database("boom".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_domain_messages_are_kept() {
        match ApiError::from(DomainError::saved_place_not_found()) {
            ApiError::NotFound(msg) => assert_eq!(msg, "saved place not found"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
        match ApiError::from(DomainError::invalid_operation("cannot remove yourself")) {
            ApiError::BadRequest(msg) => assert_eq!(msg, "cannot remove yourself"),
            other => panic!("Expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_internal_error_body_hides_details() {
        let response =
            ApiError::from(DomainError::Store(StoreError::Database("password=x".into())))
                .into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "An internal error occurred");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            format!("{}", ApiError::Unauthorized("test".to_string())),
            "Unauthorized: test"
        );
        assert_eq!(format!("{}", ApiError::Gone("test".to_string())), "Gone: test");
        assert_eq!(
            format!("{}", ApiError::Validation("test".to_string(), vec![])),
            "Validation error: test"
        );
    }

    #[test]
    fn test_from_validation_errors() {
        let mut errors = validator::ValidationErrors::new();
        let mut error = validator::ValidationError::new("length");
        error.message = Some("Plan name must be between 2 and 20 characters".into());
        errors.add("name", error);

        match ApiError::from(errors) {
            ApiError::Validation(msg, details) => {
                assert_eq!(msg, "Plan name must be between 2 and 20 characters");
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "name");
            }
            other => panic!("Expected Validation, got {other:?}"),
        }
    }
}
