//! Main entry point for the LRD rating service
//!
//! Loads configuration, initializes logging, and runs the HTTP server with
//! graceful shutdown on SIGINT/SIGTERM.

use anyhow::Result;
use clap::Parser;
use lrd_rating::config::AppConfig;
use lrd_rating::service::{serve, AppState};
use std::path::PathBuf;
use tokio::signal;
use tracing::info;

/// LRD Rating Service - weighted linear regression ratings over score differentials
#[derive(Parser)]
#[command(
    name = "lrd-rating",
    version,
    about = "Rating service computing team strength from score differentials",
    long_about = "LRD Rating fits relative team strength ratings with weighted least \
                 squares over game score differentials, optionally anchored by seeding \
                 priors, and serves a prediction sensitivity curve for hypothetical matchups."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// HTTP port override
    #[arg(short, long, value_name = "PORT", help = "Override HTTP server port")]
    port: Option<u16>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(
        long,
        help = "Validate configuration and exit without starting service"
    )]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C) signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

/// Display startup banner with service information
fn display_startup_banner(config: &AppConfig) {
    info!("LRD Rating Service");
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   HTTP port: {}", config.service.http_port);
    info!(
        "   CORS origins: {}",
        config.cors.allowed_origins.join(", ")
    );
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(port) = args.port {
        config.service.http_port = port;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    display_startup_banner(&config);

    if args.dry_run {
        info!("Configuration validation successful");
        info!("Dry run completed - exiting without starting service");
        return Ok(());
    }

    let state = AppState::new(config)?;

    serve(state, wait_for_shutdown_signal()).await?;

    info!("LRD Rating Service stopped");
    Ok(())
}
