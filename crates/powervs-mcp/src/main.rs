//! PowerVS MCP Server - Model Context Protocol tools for IBM Power Virtual Server.
//!
//! This binary serves MCP over streamable HTTP on `/mcp` and answers tool
//! calls with the powervs-core client.

mod handlers;
mod server;

use anyhow::{Context, Result};
use clap::Parser;
use powervs_core::{PowerVsClient, PowerVsConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "powervs-mcp")]
#[command(about = "MCP server for IBM Power Virtual Server monitoring")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, env = "MCP_SERVER_PORT", default_value = "8002")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Enable debug logging (overrides LOG_LEVEL)
    #[arg(short, long)]
    debug: bool,

    /// Path to config.yaml (defaults to ./config.yaml, then the user config dir)
    #[arg(short, long, env = "POWERVS_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging; stdout is reserved for the port announcement
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"))
    };
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    info!("Starting PowerVS MCP Server");

    let config = PowerVsConfig::load(args.config.as_deref())
        .context("Failed to load PowerVS configuration")?;

    info!("Base URL: {}", config.base_url);
    if config.has_workspace() {
        info!("Cloud instance: {}", config.cloud_instance_id());
    } else {
        info!("No CRN configured, tools will scan all workspaces");
    }
    info!("Account: {}", config.account_id);

    let client = PowerVsClient::new(config)?;

    // Start the server
    let addr = server::start_server(client, &args.host, args.port).await?;

    // Print port for launchers and tests to read
    println!("MCP_PORT={}", addr.port());

    info!("MCP server running on {}", addr);

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
