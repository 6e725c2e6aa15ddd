use anyhow::Result;
use clap::Command;
use insight_gateway::build_api_server_from_env;
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup tracing with configurable format
    let json_format = env::var("LOG_FORMAT")
        .unwrap_or_else(|_| "plain".to_string())
        .to_lowercase()
        == "json";
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    if json_format {
        builder.json().init();
    } else {
        builder.init();
    }

    let _matches = Command::new("insight-gateway")
        .about("Insight BI dashboard gateway")
        .version(env!("CARGO_PKG_VERSION"))
        .get_matches();

    info!("Loading configuration from environment variables...");
    let server = build_api_server_from_env().await?;

    info!("Starting Insight gateway API server...");
    if let Err(e) = server.serve().await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
