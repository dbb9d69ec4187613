// Standalone MCP server binary

use anyhow::{Context, Result};
use clap::Parser;
use ghbridge_core::{BridgeConfig, GrasshopperClient};
use ghbridge_mcp::server::McpServer;
use ghbridge_mcp::{resources, tools, ResourceRegistry, ToolRegistry};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ghbridge-mcp")]
#[command(about = "MCP server bridging agent clients to a Grasshopper host", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "GHBRIDGE_CONFIG", default_value = "ghbridge.toml")]
    config: PathBuf,

    /// Grasshopper host (overrides config and GRASSHOPPER_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Grasshopper port (overrides config and GRASSHOPPER_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghbridge=info,ghbridge_core=info,ghbridge_mcp=info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = BridgeConfig::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let client = GrasshopperClient::from_config(config).context("Invalid bridge configuration")?;
    tracing::info!(
        endpoint = %client.endpoint(),
        aliases = client.component_types().len(),
        "ghbridge MCP server starting"
    );

    let mut tool_registry = ToolRegistry::new();
    tools::register_all(&mut tool_registry, &client);

    let mut resource_registry = ResourceRegistry::new();
    resources::register_all(&mut resource_registry, &client);

    tracing::info!("Registered {} tools", tool_registry.len());

    let server = McpServer::new(tool_registry, resource_registry);
    server.start().await?;

    Ok(())
}
