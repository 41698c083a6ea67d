use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::CoreError;

/// Standardised API error response body for the notes endpoints.
///
/// Every error serialises as:
/// ```json
/// { "ok": false, "error": { "code": "<code>", "message": "<message>" } }
/// ```
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorResponse,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    pub ok: bool,
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorResponse {
                ok: false,
                error: ApiErrorBody {
                    code: code.into(),
                    message: message.into(),
                },
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let status = match &err {
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CoreError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CoreError::Store(_) | CoreError::EmptyResponse(_) | CoreError::Provider(_) => {
                StatusCode::BAD_GATEWAY
            }
        };
        Self::new(status, err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_are_bad_gateway() {
        let error = ApiError::from(CoreError::Store("permission denied".to_string()));
        assert_eq!(error.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(error.body.error.code, "store");
        assert_eq!(error.body.error.message, "permission denied");
        assert!(!error.body.ok);
    }

    #[test]
    fn validation_and_auth_map_to_client_errors() {
        assert_eq!(
            ApiError::from(CoreError::Validation("empty".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CoreError::Unauthorized("no session".to_string())).status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
