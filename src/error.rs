// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::StoreError;

/// Body of every 401 response. The actual rejection reason is only logged.
pub const ACCESS_DENIED: &str = "Access Denied";

/// HTTP API error with appropriate status codes and client-facing bodies
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request: unparseable request
    BadRequest(String),
    // 400 Bad Request: per-field store messages
    Validation(Vec<String>),

    // 401 Unauthorized, carries the server-side reason
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation(errors) => json!({ "errors": errors }),
            ApiError::BadRequest(message) => json!({ "errors": [message] }),
            ApiError::Unauthorized(_) => json!({ "message": ACCESS_DENIED }),
            ApiError::NotFound(message)
            | ApiError::InternalServerError(message)
            | ApiError::ServiceUnavailable(message) => json!({ "message": message }),
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation(errors: Vec<String>) -> Self {
        ApiError::Validation(errors)
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        ApiError::Unauthorized(reason.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(errors) | StoreError::UniqueConstraint(errors) => {
                ApiError::validation(errors)
            }
            StoreError::NotFound(what) => ApiError::not_found(format!("{} not found", what)),
            StoreError::Database(sqlx::Error::PoolTimedOut) => {
                tracing::error!("Database pool timed out");
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            other => {
                // Don't expose internal errors to clients
                tracing::error!("Unhandled store error: {}", other);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(errors) => write!(f, "{}", errors.join(", ")),
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_body_never_carries_the_reason() {
        let err = ApiError::unauthorized("No user found with email address: jo@example.com");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_json(), json!({ "message": "Access Denied" }));
    }

    #[test]
    fn validation_kinds_become_400_with_errors() {
        let err: ApiError = StoreError::UniqueConstraint(vec!["Email address already in use".into()]).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_json(), json!({ "errors": ["Email address already in use"] }));

        let err: ApiError =
            StoreError::Validation(vec!["A title is required".into(), "A description is required".into()]).into();
        assert_eq!(
            err.to_json(),
            json!({ "errors": ["A title is required", "A description is required"] })
        );
    }

    #[test]
    fn bad_request_is_wrapped_in_errors_array() {
        let err = ApiError::bad_request("expected value at line 1 column 1");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_json()["errors"][0], "expected value at line 1 column 1");
    }

    #[test]
    fn other_store_failures_become_500() {
        let err: ApiError = StoreError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: ApiError = StoreError::PasswordHash("boom".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_json()["message"].as_str().unwrap().contains("boom"));
    }

    #[test]
    fn not_found_names_the_record() {
        let err: ApiError = StoreError::NotFound("course 3".into()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_json(), json!({ "message": "course 3 not found" }));
    }
}
