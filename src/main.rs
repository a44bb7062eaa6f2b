//! tgrab - Telegram channel preview scraper and rewrite toolkit.
//!
//! Scrapes public channels through the t.me/s web preview, optionally
//! rewrites a post through an LLM, and chunks output for delivery through
//! platform message-size limits.

use telegrab::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "telegrab=info"
    } else {
        "telegrab=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::run().await
}
