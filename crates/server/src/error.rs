use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use services::RecorderError;

/// HTTP-facing error: validation problems become 400, everything else 500.
///
/// The body is always `{"error": <message>}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<RecorderError> for ApiError {
    fn from(err: RecorderError) -> Self {
        if err.is_validation() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_400() {
        let err = ApiError::from(RecorderError::Profile(
            reps_core::model::ProfileCodeError::Blank,
        ));
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
