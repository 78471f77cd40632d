use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("pixelart_requests_total", "Total number of generation requests")
            .unwrap();
    pub static ref REQUESTS_THROTTLED: Counter = register_counter!(
        "pixelart_requests_throttled_total",
        "Requests denied by the cooldown"
    )
    .unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("pixelart_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("pixelart_cache_misses_total", "Total cache misses").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "pixelart_request_latency_seconds",
        "Generation request latency in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("pixelart_cache_size", "Current number of items in cache").unwrap();
}
