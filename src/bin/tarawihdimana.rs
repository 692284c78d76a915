//! Tarawihdimana gateway - Main binary

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tarawihdimana::security::{SecurityConfig, SecurityProvider};
use tarawihdimana::{HttpTransport, ServerConfig, TarawihService};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tarawihdimana")]
#[command(about = "Mosque search and prayer-times gateway")]
#[command(version)]
struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to bind to
    #[arg(long, default_value = "9999")]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Environment file loaded before configuration is read
    #[arg(long, default_value = ".env")]
    env_file: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(tracing_subscriber::EnvFilter::new(&cli.log_level))
        .init();

    info!("Starting Tarawihdimana gateway v{}", tarawihdimana::VERSION);

    // Both of these abort startup: there is no degraded mode without them.
    dotenvy::from_filename(&cli.env_file)
        .with_context(|| format!("Error loading env file {}", cli.env_file))?;
    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        log_level: cli.log_level,
        ..ServerConfig::from_env()?
    };

    info!("Allowed origins: {:?}", config.allowed_origins);
    info!(
        "Response cache {}, rate limit {} req/s",
        if config.use_response_cache { "enabled" } else { "disabled" },
        config.rate_limit_max
    );

    let security = Arc::new(SecurityProvider::new(SecurityConfig {
        rate_limit_max: config.rate_limit_max,
    }));
    let service = Arc::new(
        TarawihService::from_config(&config).with_validator(security.validator().clone()),
    );
    let transport = HttpTransport::from_config(&config, security);

    let shutdown_signal = async {
        match signal::ctrl_c().await {
            Ok(_) => info!("Received Ctrl+C, shutting down..."),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }
    };

    info!("Starting HTTP transport on {}:{}", config.host, config.port);
    if let Err(e) = transport.start(service, shutdown_signal).await {
        error!("HTTP transport error: {:#}", e);
        return Err(e);
    }

    info!("Tarawihdimana gateway shutdown complete");
    Ok(())
}
