use clap::Parser;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "pixelart-gateway")]
#[command(about = "Prompt-to-pixel-art generation gateway")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Base URL of the upstream generation API
    #[arg(short, long, default_value = "https://generativelanguage.googleapis.com")]
    pub upstream_url: String,

    // Model identifier sent to the upstream service
    #[arg(short, long, default_value = "gemini-2.5-flash")]
    pub model: String,

    // Cooldown between accepted generations per client, in seconds
    #[arg(long, default_value_t = 5)]
    pub cooldown: u64,

    // Upstream request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub upstream_timeout: u64,

    // Cache TTL in seconds
    #[arg(short, long, default_value_t = 30)]
    pub cache_ttl: u64,

    // Throttle map sweep interval in seconds
    #[arg(long, default_value_t = 60)]
    pub sweep_interval: u64,
}
