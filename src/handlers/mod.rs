mod export;
mod generate;
mod health;
mod metrics;

pub use export::export_handler;
pub use generate::generate_handler;
pub use health::health_handler;
pub use metrics::metrics_handler;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/generate", post(generate_handler))
        .route("/api/export", post(export_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}
