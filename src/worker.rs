use dashmap::DashMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::cache::{CacheEntry, make_cache_key};
use crate::error::PipelineError;
use crate::gemini::GeminiClient;
use crate::grid::{self, PixelGrid};
use crate::metrics::{CACHE_HITS, CACHE_MISSES, CACHE_SIZE};
use crate::models::GenerationJob;
use crate::{prompt, sanitize};

// Background worker - drains the job queue and runs the generation
// pipeline one request at a time. Handlers stay concurrent; upstream
// calls are serialized here. The worker owns the grid cache.
pub async fn generation_worker(
    mut rx: mpsc::Receiver<GenerationJob>,
    client: GeminiClient,
    ttl: Duration,
) {
    tracing::info!("generation worker started");

    let cache: DashMap<String, CacheEntry> = DashMap::new();

    while let Some(job) = rx.recv().await {
        let cache_key = make_cache_key(client.model(), &job.prompt);

        // check cache first
        if let Some(entry) = cache.get(&cache_key) {
            if entry.created_at.elapsed() < ttl {
                CACHE_HITS.inc();
                tracing::debug!("cache hit");
                let _ = job.response_tx.send(Ok(entry.grid.clone()));
                continue;
            }
        }
        CACHE_MISSES.inc();

        let result = run_pipeline(&client, &job.prompt).await;

        if let Ok(pixel_grid) = &result {
            cache.insert(
                cache_key,
                CacheEntry {
                    grid: pixel_grid.clone(),
                    created_at: Instant::now(),
                },
            );
            CACHE_SIZE.set(cache.len() as f64);
        }

        // caller may have hung up; nothing to do about it
        let _ = job.response_tx.send(result);
    }
}

// compile -> generate -> clean/decode -> validate
pub async fn run_pipeline(
    client: &GeminiClient,
    user_prompt: &str,
) -> Result<PixelGrid, PipelineError> {
    let (system_instruction, user_content) = prompt::compile(user_prompt);
    let raw = client.generate(&system_instruction, &user_content).await?;
    let decoded = sanitize::decode(&raw)?;
    grid::validate(&decoded)
}
