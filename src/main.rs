use clap::{Parser, Subcommand};
use pathcors::config::Config;
use pathcors::error::AppResult;
use pathcors::{rules, server};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// pathcors - path-scoped CORS rules in front of an HTTP service
#[derive(Parser, Debug)]
#[command(name = "pathcors")]
#[command(version)]
#[command(about = "Path-scoped CORS rules in front of an HTTP service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server
    Serve {
        /// Host to bind to (overrides SERVER_HOST env var)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides SERVER_PORT env var)
        #[arg(long)]
        port: Option<u16>,

        /// Corsfile to load (overrides CORS_CONFIG_PATH env var)
        #[arg(long, short)]
        config: Option<PathBuf>,
    },

    /// Parse a Corsfile and print the resulting rules as JSON
    Check {
        /// Corsfile to check (overrides CORS_CONFIG_PATH env var)
        #[arg(long, short)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string())),
        )
        .init();

    // Load configuration
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Serve { host, port, config: path } => {
            // Override config with CLI args if provided
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(path) = path {
                config.cors.config_path = path;
            }
            config.validate()?;

            server::run_server(config).await
        }
        Commands::Check { config: path } => {
            let path = path.unwrap_or(config.cors.config_path);
            let rules = rules::load_rules(&path)?;
            println!("{}", serde_json::to_string_pretty(&rules)?);
            Ok(())
        }
    }
}
