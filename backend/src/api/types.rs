//! REST API response types.
//!
//! All bodies are camelCase JSON. Errors share one envelope, built by
//! [`error_response`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::catalog::query::QuerySpec;
use crate::error::ServerError;
use crate::location::LocationResolver;
use crate::models::{Recording, ThemeCount};

/// A recording as served, with its location resolved for the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingView {
    pub identifier: String,
    pub recorded_date: NaiveDate,
    pub title: String,
    pub year: i32,
    pub themes: Vec<String>,
    pub location_ref: String,
    pub url: String,
}

impl RecordingView {
    pub fn new(recording: &Recording, resolver: &dyn LocationResolver) -> Self {
        Self {
            identifier: recording.identifier().to_string(),
            recorded_date: recording.recorded_date(),
            title: recording.title().to_string(),
            year: recording.year(),
            themes: recording.themes().to_vec(),
            location_ref: recording.location_ref().to_string(),
            url: resolver.resolve(recording.location_ref()),
        }
    }
}

/// `GET /api/recordings`
#[derive(Debug, Clone, Serialize)]
pub struct RecordingsResponse {
    pub recordings: Vec<RecordingView>,
    /// Number of recordings returned.
    pub total: usize,
    /// The validated query, echoed back.
    pub filters: QuerySpec,
}

/// `GET /api/themes`
#[derive(Debug, Clone, Serialize)]
pub struct ThemesResponse {
    pub themes: Vec<ThemeCount>,
}

/// `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub recordings: usize,
}

/// Create an error response
pub fn error_response(error: &str, error_id: Option<Uuid>) -> Value {
    json!({
        "status": "error",
        "error": error,
        "errorId": error_id.map(|id| id.to_string()),
    })
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            tracing::debug!(error = %self, "rejected request");
            return (StatusCode::BAD_REQUEST, Json(error_response(&self.to_string(), None)))
                .into_response();
        }

        // details stay in the server log
        let error_id = Uuid::new_v4();
        tracing::error!(%error_id, error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_response("Internal server error", Some(error_id))),
        )
            .into_response()
    }
}
