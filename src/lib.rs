//! Prompt-to-pixel-art generation gateway.
//!
//! Accepts a short natural-language description over HTTP, delegates the
//! creative work to an external text-completion service, then validates,
//! decodes and rasterizes the model's structured output into a 32x32
//! indexed-color sprite.

pub mod cache;
pub mod config;
pub mod error;
pub mod gemini;
pub mod grid;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod prompt;
pub mod rate_limit;
pub mod raster;
pub mod sanitize;
pub mod state;
pub mod worker;
