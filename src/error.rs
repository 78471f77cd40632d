use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

// Wire shape for every failure leaving the pipeline
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

// Everything that can go wrong between an inbound prompt and a validated
// grid. The Display strings are the user-facing messages; `details()`
// carries the operator-facing diagnostics.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Please wait {0} seconds before generating again.")]
    RateLimited(u64),

    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error("Server Error")]
    UpstreamService(String),

    #[error("AI request timed out after {0} seconds")]
    GenerationTimeout(u64),

    #[error("AI returned empty response")]
    EmptyGenerationResult,

    #[error("AI generated invalid JSON. Please try again.")]
    MalformedPayload(String),

    #[error("AI generated a malformed grid.")]
    MalformedGrid { observed: usize },

    #[error("AI generated a malformed grid.")]
    MalformedRow { row: usize, observed: usize },

    #[error("AI generated a malformed grid.")]
    MalformedCell { row: usize, col: usize, value: String },

    #[error("Image export failed")]
    ExportFailed(String),

    #[error("Generation queue is unavailable")]
    QueueClosed,
}

impl PipelineError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::EmptyPrompt => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn details(&self) -> Option<String> {
        match self {
            Self::UpstreamService(cause) => Some(cause.clone()),
            Self::GenerationTimeout(secs) => Some(format!("no upstream response within {secs}s")),
            Self::MalformedPayload(cleaned) => {
                Some(format!("unparseable payload: {}", truncate(cleaned, 200)))
            }
            Self::MalformedGrid { observed } => Some(format!("expected 32 rows, got {observed}")),
            Self::MalformedRow { row, observed } => {
                Some(format!("row {row}: expected 32 cells, got {observed}"))
            }
            Self::MalformedCell { row, col, value } => {
                Some(format!("cell ({row},{col}): invalid color index {value}"))
            }
            Self::ExportFailed(cause) => Some(cause.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = self.status();
        // every failure is logged before it is converted to a response
        match &self {
            Self::RateLimited(_) | Self::EmptyPrompt => {
                tracing::warn!(%status, "{}", self);
            }
            _ => {
                tracing::error!(%status, details = ?self.details(), "{}", self);
            }
        }
        let body = ErrorBody {
            error: self.to_string(),
            details: self.details(),
        };
        (status, Json(body)).into_response()
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(limit).collect();
        format!("{prefix}...")
    }
}
