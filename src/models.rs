use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::PipelineError;
use crate::grid::PixelGrid;

// Generation endpoint request format
#[derive(Deserialize, Serialize, Clone)]
pub struct GenerateRequest {
    #[serde(rename = "userPrompt")]
    pub user_prompt: String,
}

// Generation endpoint response format
#[derive(Serialize)]
pub struct GenerateResponse {
    pub data: PixelGrid,
}

// Export endpoint request: a previously generated grid plus the prompt
// that names the download
#[derive(Deserialize)]
pub struct ExportRequest {
    #[serde(rename = "userPrompt", default)]
    pub user_prompt: String,
    pub data: serde_json::Value,
}

// Export endpoint JSON response (dataurl format)
#[derive(Serialize)]
pub struct ExportResponse {
    #[serde(rename = "dataUrl")]
    pub data_url: String,
    pub filename: String,
}

// Queued job - holds the prompt + one-time channel to send back the result
pub struct GenerationJob {
    pub prompt: String,
    pub response_tx: oneshot::Sender<Result<PixelGrid, PipelineError>>,
}
