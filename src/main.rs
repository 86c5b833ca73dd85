mod api;
mod materialize;
#[cfg(test)]
mod testutil;

use clap::{Parser, Subcommand};
use sparkclean_ai::GeminiSuggester;
use sparkclean_audit::AuditLogger;
use sparkclean_backend::BackendClient;
use sparkclean_core::config;
use sparkclean_core::traits::Suggester;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

#[derive(Parser)]
#[command(
    name = "sparkclean",
    version,
    about = "SparkClean — household task management API"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server.
    Serve,
    /// Check configuration and upstream availability.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Serve => {
            let cfg = config::load(&cli.config)?;

            let backend = Arc::new(BackendClient::from_config(&cfg.backend)?);
            let suggester = GeminiSuggester::from_config(&cfg.ai);
            if !suggester.is_available().await {
                warn!("Gemini is not reachable; recommendations will use the fallback list");
            }

            let audit = if cfg.audit.enabled {
                Some(AuditLogger::new(&cfg.audit).await?)
            } else {
                None
            };

            let state = api::ApiState {
                auth: backend.clone(),
                store: backend,
                suggester: Arc::new(suggester),
                audit,
                lookahead_days: cfg.tasks.lookahead_days,
                uptime: Instant::now(),
            };

            println!("SparkClean — starting API server...");
            api::serve(&cfg, state).await?;
        }
        Commands::Status => {
            let cfg = config::load(&cli.config)?;
            println!("SparkClean — Status Check\n");
            println!("Config: {}", cli.config);
            println!("Bind: {}:{}", cfg.api.host, cfg.api.port);
            println!("Lookahead: {} days", cfg.tasks.lookahead_days);
            println!();

            match BackendClient::from_config(&cfg.backend) {
                Ok(backend) => {
                    let reachable = backend.is_available().await;
                    println!(
                        "  backend: {}",
                        if reachable { "available" } else { "unreachable" }
                    );
                }
                Err(e) => println!("  backend: not configured ({e})"),
            }

            let suggester = GeminiSuggester::from_config(&cfg.ai);
            let available = suggester.is_available().await;
            println!(
                "  gemini: {}",
                if available {
                    "available"
                } else {
                    "unavailable (fallback list will be used)"
                }
            );

            println!(
                "  audit: {}",
                if cfg.audit.enabled { "enabled" } else { "disabled" }
            );
        }
    }

    Ok(())
}
