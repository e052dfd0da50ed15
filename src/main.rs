//! Restaurant Rating Prediction - Main Entry Point
//!
//! Loads the compressed regression model once, then serves the prediction
//! form and JSON API over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use restaurant_rating::{
    config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH},
    metrics::{MetricsReporter, PredictionMetrics},
    models::inference::InferenceEngine,
    web::{create_router, AppState},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "restaurant-rating", about = "Restaurant rating prediction service")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("info")
            .add_directive(format!("restaurant_rating={}", logging.level).parse()?),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration; the default file is optional, an explicit one is not
    let (config, config_source) = match &args.config {
        Some(path) => (
            AppConfig::load_from_path(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            path.display().to_string(),
        ),
        None if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() => {
            (AppConfig::load()?, DEFAULT_CONFIG_PATH.to_string())
        }
        None => (AppConfig::default(), "defaults".to_string()),
    };

    init_logging(&config.logging)?;

    info!("Starting Restaurant Rating Prediction service");
    if config_source == "defaults" {
        warn!(path = DEFAULT_CONFIG_PATH, "Configuration file not found, using defaults");
    }
    info!(source = %config_source, "Configuration loaded successfully");

    // Load the model once; without it nothing can be served
    let engine = match InferenceEngine::new(&config) {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            error!(error = %e, path = %config.model.path, "Error loading model");
            return Err(anyhow::Error::new(e).context("Model could not be loaded, refusing to start"));
        }
    };

    let metrics = Arc::new(PredictionMetrics::new());
    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let app = create_router(AppState::new(engine, metrics.clone()));
    let listener = tokio::net::TcpListener::bind(config.server.bind_address.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;

    info!(address = %config.server.bind_address, "Serving prediction form");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!("Service shutting down...");
    metrics.print_summary();

    Ok(())
}
