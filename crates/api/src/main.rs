//! E-Rezept demo FHIR server.
//!
//! Serves the FHIR R4 REST API for e-prescriptions from in-memory stores.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use erezept_persistence::{ResourceHandlers, StoreRegistry};
use erezept_rest::{ServerConfig, create_app_with_config, init_logging, seed_demo_data};
use tracing::info;

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(address = %addr, "Server listening");
    info!("FHIR endpoint: http://{}/fhir", addr);
    info!("CapabilityStatement: http://{}/fhir/metadata", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        seed_demo_data = config.seed_demo_data,
        "Starting E-Rezept demo FHIR server"
    );

    let registry = Arc::new(StoreRegistry::new());

    if config.seed_demo_data {
        seed_demo_data(&ResourceHandlers::new(&registry))
            .await
            .context("loading demo data")?;
    }

    let app = create_app_with_config(registry, config.clone());
    serve(app, &config).await
}
