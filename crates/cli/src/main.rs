use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ghbridge_core::{BridgeConfig, GrasshopperClient};
use std::path::PathBuf;

mod commands;

use commands::smoke::SmokeSuite;

#[derive(Parser, Debug)]
#[command(name = "ghbridge")]
#[command(about = "Inspect, exercise and grade Grasshopper documents", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "GHBRIDGE_CONFIG", default_value = "ghbridge.toml")]
    config: PathBuf,

    /// Grasshopper host (overrides config and GRASSHOPPER_HOST)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Grasshopper port (overrides config and GRASSHOPPER_PORT)
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send one raw command and print the response
    Send {
        /// Command name, e.g. get_document_info
        command: String,
        /// Parameters as a JSON object
        #[arg(default_value = "{}")]
        params: String,
    },
    /// Check whether the host accepts connections
    Status,
    /// Summarize the open document
    Info,
    /// Score the document with the rubric
    Grade {
        /// Grade a saved snapshot instead of the live document
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build an agent grading prompt for the document
    Prompt {
        /// File with the assignment requirements
        #[arg(long)]
        requirements: PathBuf,
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Render an agent review result, optionally into a canvas panel
    Review {
        /// JSON file with the review result
        file: PathBuf,
        /// Panel component to receive the text
        #[arg(long)]
        panel: Option<String>,
    },
    /// Build the circle exercise on the canvas
    Exercise,
    /// Run a smoke-test sequence against the host
    Smoke {
        #[arg(value_enum, default_value_t = SmokeSuite::Basic)]
        suite: SmokeSuite,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghbridge=warn,ghbridge_core=warn".into()),
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
    tracing::debug!(endpoint = %client.endpoint(), "Client ready");

    match args.command {
        Command::Send { command, params } => commands::inspect::send(&client, &command, &params).await,
        Command::Status => commands::inspect::status(&client).await,
        Command::Info => commands::inspect::info(&client).await,
        Command::Grade { snapshot, json } => {
            commands::grade::grade(&client, snapshot.as_deref(), json).await
        }
        Command::Prompt {
            requirements,
            snapshot,
        } => commands::grade::prompt(&client, &requirements, snapshot.as_deref()).await,
        Command::Review { file, panel } => {
            commands::grade::review(&client, &file, panel.as_deref()).await
        }
        Command::Exercise => commands::exercise::run(&client).await,
        Command::Smoke { suite } => commands::smoke::run(&client, suite).await,
    }
}
