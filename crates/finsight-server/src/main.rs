//! FinSight server binary
//!
//! Usage:
//!   finsight --port 3000                 Start the API server
//!   finsight --static-dir ./web         Also serve the single-page view
//!
//! The AI backend is configured through the environment (GEMINI_API_KEY,
//! or AI_BACKEND=openai_compatible with OPENAI_COMPATIBLE_HOST).

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// FinSight - turn receipts and statements into financial insights
#[derive(Parser)]
#[command(name = "finsight")]
#[command(about = "Document-to-dashboard financial insight server", long_about = None)]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Directory with the single-page view to serve
    #[arg(long)]
    static_dir: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    finsight_server::serve(
        &cli.host,
        cli.port,
        cli.static_dir.as_deref(),
        finsight_server::ServerConfig::from_env(),
    )
    .await
}
