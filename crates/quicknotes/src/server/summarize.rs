//! Summarization endpoint.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::CoreError;
use crate::server::ServerState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SummarizeRequest {
    /// Note text to summarize.
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummarizeResponse {
    pub summary: String,
}

/// Error body of the summarize endpoint: `{ "error": "<message>" }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SummarizeErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct SummarizeError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for SummarizeError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(SummarizeErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<CoreError> for SummarizeError {
    fn from(error: CoreError) -> Self {
        let (status, message) = match error {
            CoreError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            CoreError::Configuration(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
            CoreError::Provider(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate summary: {detail}"),
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate summary: {other}"),
            ),
        };
        Self { status, message }
    }
}

#[utoipa::path(
    post,
    path = "/api/summarize",
    tag = "summary",
    request_body = SummarizeRequest,
    responses(
        (status = 200, body = SummarizeResponse),
        (status = 400, description = "Missing or empty content", body = SummarizeErrorResponse),
        (status = 500, description = "Missing API key or provider failure",
            body = SummarizeErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub(crate) async fn summarize(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<Json<SummarizeResponse>, SummarizeError> {
    let content = request_content(&body);
    let summary = state.gateway.summarize(content.as_deref()).await?;
    Ok(Json(SummarizeResponse { summary }))
}

/// Parses the body as JSON whatever its content type. A body that is not an
/// object with a string `content` counts as having no content.
fn request_content(body: &[u8]) -> Option<String> {
    match serde_json::from_slice::<SummarizeRequest>(body) {
        Ok(request) => request.content,
        Err(error) => {
            tracing::debug!(%error, "summarize body is not a content object");
            None
        }
    }
}
