//! API error types mapped to HTTP status codes.
//!
//! Every failure a lookup can produce is a caller error: [`ApiError`] maps
//! it to 400 with a JSON response body `{"error": "message"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use placenames_types::ValidationError;
use serde_json::json;

/// Application-level error type that implements `IntoResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// Invalid request parameters (400).
    BadRequest(String),
}

impl From<ValidationError> for ApiError {
    /// Rephrases the limit error in terms of the `max_results` parameter.
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(format!(
            "max_results must be a positive integer less than or equal to {}",
            err.max()
        ))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        let body = axum::Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_is_bad_request() {
        let err = ApiError::from(ValidationError::LimitOutOfRange {
            requested: 0,
            max: 100,
        });
        let ApiError::BadRequest(msg) = &err;
        assert_eq!(
            msg,
            "max_results must be a positive integer less than or equal to 100"
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unparsable_limit_is_bad_request() {
        let err = ApiError::from(ValidationError::InvalidLimit {
            raw: "ten".into(),
            max: 7,
        });
        let ApiError::BadRequest(msg) = &err;
        assert!(msg.ends_with("less than or equal to 7"), "{msg}");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
