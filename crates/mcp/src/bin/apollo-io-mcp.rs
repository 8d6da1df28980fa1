// Standalone MCP server binary

use anyhow::{Context, Result};
use apollo_io_mcp::config::{ServerConfig, DEFAULT_CONFIG_FILE};
use apollo_io_mcp::server::McpServer;
use apollo_io_mcp::tools::apollo_tools;
use apollo_io_sdk::API_KEY_ENV;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "apollo-io-mcp")]
#[command(about = "Apollo.io MCP server over stdio", long_about = None)]
#[command(version)]
struct Args {
    /// Apollo.io API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// How the API key is sent: api-key-header or bearer
    #[arg(long)]
    auth_scheme: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apollo_io_mcp=info,apollo_io_sdk=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    let api_key = match args.api_key.filter(|key| !key.trim().is_empty()) {
        Some(key) => key,
        None => {
            tracing::error!("{} environment variable is required", API_KEY_ENV);
            std::process::exit(1);
        }
    };

    let config = ServerConfig::load(&args.config)?;
    let client = config
        .build_client(&api_key, args.auth_scheme.as_deref())
        .context("Failed to start Apollo.io MCP server")?;

    tracing::info!("Apollo.io MCP server starting...");

    let registry = apollo_tools(client);
    tracing::info!("Registered {} tools", registry.len());

    let server = McpServer::new(registry);

    let shutdown = server.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, shutting down");
            shutdown.cancel();
        }
        // A second interrupt skips the flush
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(0);
        }
    });

    server.run().await?;

    tracing::info!("Apollo.io MCP server stopped");
    // The stdin reader thread never returns on its own
    std::process::exit(0);
}
