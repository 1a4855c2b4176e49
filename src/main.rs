//! pasaydan-admin server entry point.
//!
//! Starts the Axum HTTP server with the admin REST endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use pasaydan_admin::api;
use pasaydan_admin::app_state::AppState;
use pasaydan_admin::config::{AdminConfig, LogFormat};
use pasaydan_admin::import::BatchImporter;
use pasaydan_admin::persistence::{InMemoryStore, LocalFileStore, PostgresStore, RecordStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AdminConfig::from_env().context("invalid LISTEN_ADDR")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting pasaydan-admin");

    // Build persistence layer
    let store: Arc<dyn RecordStore> = if config.persistence_enabled {
        Arc::new(
            PostgresStore::connect(&config)
                .await
                .context("connecting to PostgreSQL")?,
        )
    } else {
        tracing::warn!("persistence disabled, records are kept in memory only");
        Arc::new(InMemoryStore::new())
    };
    let files = Arc::new(LocalFileStore::new(config.upload_dir.clone()));

    // Build application state
    let app_state = AppState::new(store, files, BatchImporter::new(config.import_batch_size));

    // Build router
    let app = api::build_app(app_state, config.max_upload_bytes);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
