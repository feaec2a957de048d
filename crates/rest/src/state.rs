//! Application state for the FHIR REST API.
//!
//! The state is shared by every request handler. It owns the store registry
//! and the resource handlers built on top of it.

use std::sync::Arc;

use erezept_persistence::{ResourceHandlers, StoreRegistry};

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use erezept_persistence::StoreRegistry;
/// use erezept_rest::{AppState, ServerConfig};
///
/// let state = AppState::new(Arc::new(StoreRegistry::new()), ServerConfig::default());
/// assert_eq!(state.backend_name(), "memory");
/// ```
#[derive(Clone)]
pub struct AppState {
    /// The store registry.
    registry: Arc<StoreRegistry>,

    /// Handlers bound to the registry's stores.
    handlers: ResourceHandlers,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

impl AppState {
    /// Creates a new AppState, binding one handler per resource type to
    /// the registry.
    pub fn new(registry: Arc<StoreRegistry>, config: ServerConfig) -> Self {
        let handlers = ResourceHandlers::new(&registry);
        Self {
            registry,
            handlers,
            config: Arc::new(config),
        }
    }

    /// Returns the store registry.
    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }

    /// Returns the resource handlers.
    pub fn handlers(&self) -> &ResourceHandlers {
        &self.handlers
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Name of the storage backend behind the registry.
    pub fn backend_name(&self) -> &'static str {
        self.registry.backend_name()
    }
}
