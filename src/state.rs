use dashmap::DashMap;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::models::GenerationJob;
use crate::rate_limit::ThrottleEntry;

// app's shared state
pub struct AppState {
    pub throttle: DashMap<String, ThrottleEntry>, // client key -> last accepted request
    pub cooldown: Duration,                       // minimum gap between accepted generations
    pub job_tx: mpsc::Sender<GenerationJob>,
}
