// Main entry point - Dependency injection and command dispatch
use std::sync::Arc;

use clap::Parser;
use suspension_analytics::application::session_filter::SessionFilterService;
use suspension_analytics::domain::selection::TimeRange;
use suspension_analytics::infrastructure::config::load_app_config;
use suspension_analytics::infrastructure::file_repository::FileRepository;
use suspension_analytics::presentation::app_state::AppState;
use suspension_analytics::presentation::cli::{Cli, Commands};
use suspension_analytics::presentation::handlers::{filter_sessions, list_sessions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for JSON output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = load_app_config(&cli.config)?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(FileRepository::from_settings(&config.storage));

    // Create services (application layer)
    let session_service = SessionFilterService::new(repository, config.analysis.clone());

    // Create application state
    let state = AppState { session_service };

    match cli.command {
        Commands::List => list_sessions(&state).await,
        Commands::Filter {
            ids,
            start,
            end,
            pretty,
        } => filter_sessions(&state, &ids, TimeRange::new(start, end), pretty).await,
    }
}
