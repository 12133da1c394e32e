//! idlink Server
//!
//! The request/response boundary for the claim ingestion and query
//! engine: claimant subscription, claim submission, filtered claim
//! search, and vocabulary listings over HTTP.
//!
//! The engine itself lives in idlink-store; this crate wires it to axum,
//! loads configuration, and bootstraps the controlled vocabularies from
//! JSON config directories at startup.

#![warn(missing_docs)]

pub mod bootstrap;
pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use idlink_schema::SchemaRegistry;
use idlink_store::SqliteStore;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Storage error while opening the database
    #[error("Storage error: {0}")]
    Store(#[from] idlink_store::StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the HTTP server
///
/// Opens the store, loads the bootstrap vocabularies, and serves the
/// claim API until the process is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting idlink server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path);

    let mut store = SqliteStore::new(&config.database_path)?;
    let schemas = SchemaRegistry::builtin();

    if let Some(dir) = &config.vocabulary_dir {
        let report = bootstrap::load_vocabularies(&mut store, &schemas, dir);
        info!(
            "Loaded {} identifier types and {} predicates ({} files skipped)",
            report.identifier_types, report.predicates, report.skipped
        );
    }

    let state = AppState {
        store: Arc::new(Mutex::new(store)),
        schemas: Arc::new(schemas),
    };

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
