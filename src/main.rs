use clap::Parser;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use pixelart_gateway::config::Args;
use pixelart_gateway::gemini::GeminiClient;
use pixelart_gateway::handlers;
use pixelart_gateway::models::GenerationJob;
use pixelart_gateway::rate_limit;
use pixelart_gateway::state::AppState;
use pixelart_gateway::worker;

// this is main async function with tokio
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // parse cli arguments
    let args = Args::parse();

    // upstream credentials come from the environment, never the CLI
    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; upstream calls will fail");
    }

    let (job_tx, job_rx) = mpsc::channel::<GenerationJob>(100);

    // creating shared state
    let state = Arc::new(AppState {
        throttle: DashMap::new(),
        cooldown: Duration::from_secs(args.cooldown),
        job_tx,
    });

    // spawn the background worker
    let client = GeminiClient::new(
        args.upstream_url.clone(),
        args.model.clone(),
        api_key,
        Duration::from_secs(args.upstream_timeout),
    );
    tokio::spawn(worker::generation_worker(
        job_rx,
        client,
        Duration::from_secs(args.cache_ttl),
    ));

    // periodic throttle sweep so stale client entries do not pile up
    let sweep_state = Arc::clone(&state);
    let sweep_every = Duration::from_secs(args.sweep_interval);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_every);
        loop {
            ticker.tick().await;
            rate_limit::sweep(&sweep_state.throttle, sweep_state.cooldown, Instant::now());
        }
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("gateway running on http://localhost:{}", args.port);
    tracing::info!("forwarding to {} (model {})", args.upstream_url, args.model);
    tracing::info!(
        "cooldown: {}s, upstream timeout: {}s, cache TTL: {}s",
        args.cooldown,
        args.upstream_timeout,
        args.cache_ttl
    );
    axum::serve(listener, app).await.unwrap();
}
