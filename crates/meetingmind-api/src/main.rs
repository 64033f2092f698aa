//! MeetingMind CLI and REST API entry point.
//!
//! Binary name: `meetingmind`
//!
//! Loads configuration, then either serves the REST API, seeds a running
//! server with demo meetings, or prints the effective configuration.

mod cli;
mod http;
mod seed;
mod state;

use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use meetingmind_infra::config::{load_config, resolve_config_path};
use meetingmind_observe::tracing_setup::{init_tracing, shutdown_tracing, TracingOptions};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&TracingOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        json: cli.log_json,
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let config_path = resolve_config_path(cli.config.as_deref());
    let mut config = load_config(&config_path).await;

    let result = match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Commands::Seed { url, wait_secs } => seed::run(&url, Duration::from_secs(wait_secs)).await,
        Commands::CheckConfig => {
            println!("config file: {}", config_path.display());
            println!("{config:#?}");
            Ok(())
        }
    };

    shutdown_tracing();
    result
}

async fn serve(config: meetingmind_types::config::AppConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let cancel = CancellationToken::new();
    let (state, worker) = AppState::init(config, cancel.clone())?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "MeetingMind API listening");
    println!("  MeetingMind API listening on http://{addr}");
    println!("  Press Ctrl+C to stop");

    let router = http::router::build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    cancel.cancel();
    if let Err(e) = worker.await {
        tracing::error!(error = %e, "processing worker ended abnormally");
    }

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM, then cancel the background worker.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
        _ = cancel.cancelled() => {},
    }

    tracing::info!("shutdown signal received");
    cancel.cancel();
}
