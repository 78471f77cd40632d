use axum::http::HeaderMap;
use axum::{Json, extract::State};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;

use crate::error::PipelineError;
use crate::metrics::{REQUEST_LATENCY, REQUEST_TOTAL, REQUESTS_THROTTLED};
use crate::models::{GenerateRequest, GenerateResponse, GenerationJob};
use crate::rate_limit::{self, Admission};
use crate::state::AppState;

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, PipelineError> {
    REQUEST_TOTAL.inc();

    let client_id = rate_limit::client_key(&headers);
    match rate_limit::admit(&state.throttle, state.cooldown, &client_id, Instant::now()) {
        Admission::Deny { retry_after_secs } => {
            REQUESTS_THROTTLED.inc();
            return Err(PipelineError::RateLimited(retry_after_secs));
        }
        Admission::Allow => {}
    }

    let user_prompt = payload.user_prompt.trim();
    if user_prompt.is_empty() {
        return Err(PipelineError::EmptyPrompt);
    }

    let start_time = Instant::now();

    let (response_tx, response_rx) = oneshot::channel();

    let job = GenerationJob {
        prompt: user_prompt.to_string(),
        response_tx,
    };

    state
        .job_tx
        .send(job)
        .await
        .map_err(|_| PipelineError::QueueClosed)?;

    let result = response_rx.await.map_err(|_| PipelineError::QueueClosed)?;

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    result.map(|data| Json(GenerateResponse { data }))
}
