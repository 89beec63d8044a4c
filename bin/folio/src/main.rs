//! Folio - Relay-style pagination server for in-memory collections.
//!
//! # Usage
//!
//! ```bash
//! # Serve a dataset
//! folio --data data/letters.json
//!
//! # Start with environment overrides
//! FOLIO_DATA=data/letters.json GRAPHQL_PORT=8080 folio
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::signal;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use folio_core::metrics::init_metrics;
use folio_core::models::parse_dataset;
use folio_core::ports::DataSource;
use folio_graphql::{build_schema, serve_with_shutdown, ServerConfig};
use folio_memory::RecordSource;

/// Folio CLI - cursor-paginated collections over GraphQL.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Folio - Relay-style pagination over in-memory collections")]
#[command(version)]
struct Cli {
    /// JSON dataset to load (array of records with `kind` and integer `id`).
    #[arg(long, env = "FOLIO_DATA")]
    data: Option<PathBuf>,

    /// GraphQL server host.
    #[arg(long, env = "GRAPHQL_HOST", default_value = "0.0.0.0")]
    host: String,

    /// GraphQL server port.
    #[arg(long, env = "GRAPHQL_PORT", default_value = "4000")]
    graphql_port: u16,

    /// Prometheus metrics port.
    #[arg(long, env = "METRICS_PORT", default_value = "9090")]
    metrics_port: u16,

    /// Disable the GraphiQL playground.
    #[arg(long)]
    no_playground: bool,

    /// Enable JSON log output.
    #[arg(long, env = "JSON_LOGS")]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    // Prometheus metrics exporter (optional - failures don't crash the app)
    let metrics_enabled =
        match format!("0.0.0.0:{}", cli.metrics_port).parse::<std::net::SocketAddr>() {
            Ok(metrics_addr) => {
                match PrometheusBuilder::new()
                    .with_http_listener(metrics_addr)
                    .install()
                {
                    Ok(()) => {
                        init_metrics();
                        true
                    }
                    Err(e) => {
                        warn!("⚠️  Failed to start metrics exporter: {}. Continuing without metrics.", e);
                        false
                    }
                }
            }
            Err(e) => {
                warn!("⚠️  Invalid metrics address: {}. Continuing without metrics.", e);
                false
            }
        };

    // ─────────────────────────────────────────────────────────────────────────
    // 🚀 STARTUP
    // ─────────────────────────────────────────────────────────────────────────
    info!("🚀 Starting Folio");

    // ─────────────────────────────────────────────────────────────────────────
    // 📚 DATASET
    // ─────────────────────────────────────────────────────────────────────────
    let source = match &cli.data {
        Some(path) => load_dataset(path)?,
        None => {
            warn!("⚠️  No dataset given (--data / FOLIO_DATA). Serving empty collections.");
            RecordSource::for_records()
        }
    };

    for collection in source.collections()? {
        info!(collection = %collection.name, size = collection.size, "📚 Collection ready");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // ⚡ SERVER START
    // ─────────────────────────────────────────────────────────────────────────
    let graphql_config = ServerConfig {
        host: cli.host.clone(),
        port: cli.graphql_port,
        enable_playground: !cli.no_playground,
    };

    let schema = build_schema(Arc::new(source));

    info!("✅ Folio ready");
    info!("   ⚡ GraphQL:  http://localhost:{}/graphql", cli.graphql_port);
    if metrics_enabled {
        info!(
            "   📊 Metrics:  http://localhost:{}/metrics",
            cli.metrics_port
        );
    } else {
        info!("   📊 Metrics:  disabled");
    }
    info!("   Press Ctrl+C to stop");

    if let Err(e) = serve_with_shutdown(schema, graphql_config, shutdown_signal()).await {
        error!(error = %e, "❌ Server error");
        return Err(e).context("GraphQL server failed");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 🛑 SHUTDOWN
    // ─────────────────────────────────────────────────────────────────────────
    info!("🛑 Shutdown complete");
    Ok(())
}

/// Initialize tracing subscriber.
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }
}

/// Read a JSON dataset into a fresh record source.
fn load_dataset(path: &Path) -> Result<RecordSource> {
    info!(path = %path.display(), "📚 Loading dataset");

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;
    let source = dataset_source(&json)
        .with_context(|| format!("Failed to load dataset {}", path.display()))?;

    Ok(source)
}

/// Build a record source from dataset JSON.
fn dataset_source(json: &str) -> Result<RecordSource> {
    let records = parse_dataset(json).context("Invalid dataset JSON")?;
    let source = RecordSource::for_records();
    let added = source.extend(records)?;
    debug!(records = added, "Dataset loaded");
    Ok(source)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutting down...");
}
