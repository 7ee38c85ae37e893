//! Scenecast - selection-to-video companion daemon.
//!
//! Main entry point for the Scenecast CLI and server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

use scenecast::config::AppConfig;
use scenecast::server::{init_tracing, run_server};

/// Scenecast CLI.
#[derive(Parser)]
#[command(name = "scenecast")]
#[command(about = "Selection-to-video companion daemon")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    config: PathBuf,

    /// Generation service base URL (overrides the config file)
    #[arg(long, env = "SCENECAST_SERVICE_URL", global = true)]
    service_url: Option<Url>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daemon in foreground (default)
    Run {
        /// UI surface host
        #[arg(long)]
        host: Option<String>,

        /// UI surface port
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config)?;

    if let Some(service_url) = cli.service_url {
        config.service.base_url = service_url;
    }
    match cli.command {
        None => {}
        Some(Commands::Run { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
        }
    }

    run_server(config).await
}
