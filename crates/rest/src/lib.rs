//! # erezept-rest - FHIR RESTful API for E-Rezept data
//!
//! An [axum] application exposing the [FHIR RESTful API](https://hl7.org/fhir/http.html)
//! for the four E-Rezept resource types: Patient, Practitioner,
//! MedicationRequest and Bundle. Requests are served by the resource
//! handlers of `erezept-persistence`.
//!
//! ## Features
//!
//! - **CRUD**: create, read, update and delete per resource type
//! - **Search**: `_id`, `subject`/`patient` and `requester`, answered as a searchset Bundle
//! - **Versioning**: `meta.versionId` with weak ETags
//! - **Operations**: `$generate-prescription-id` and `$prescription-bundle`
//! - **Errors**: every failure is a FHIR OperationOutcome
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use erezept_persistence::StoreRegistry;
//! use erezept_rest::{ServerConfig, create_app_with_config};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ServerConfig::from_env();
//! let app = create_app_with_config(Arc::new(StoreRegistry::new()), config.clone());
//!
//! let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Server configuration
//! - [`error`] - Error types and OperationOutcome rendering
//! - [`extractors`] - Request body extraction
//! - [`handlers`] - HTTP request handlers
//! - [`responses`] - Searchset bundles and response headers
//! - [`routing`] - Route configuration
//! - [`seed`] - Demo data set
//! - [`state`] - Application state

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod responses;
pub mod routing;
pub mod seed;
pub mod state;

pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use seed::seed_demo_data;
pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, extract::DefaultBodyLimit, http::StatusCode};
use erezept_persistence::StoreRegistry;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Crate version, reported by `GET /` and the CapabilityStatement.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app(registry: Arc<StoreRegistry>) -> Router {
    create_app_with_config(registry, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// Sets up all routes and the middleware stack: tracing, request timeout,
/// body limit, and optionally CORS and request ids.
pub fn create_app_with_config(registry: Arc<StoreRegistry>, config: ServerConfig) -> Router {
    info!(
        "Creating REST API server with backend: {}",
        registry.backend_name()
    );

    let state = AppState::new(registry, config.clone());
    let router = routing::fhir_routes::create_routes(state)
        .layer(DefaultBodyLimit::max(config.max_body_size));

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    let router = router.layer(service_builder);

    if config.enable_request_id {
        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    } else {
        router
    }
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `level`. Call once at startup.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "erezept_rest={level},erezept_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
