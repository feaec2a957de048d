//! Server configuration for the E-Rezept FHIR API.
//!
//! Every option can be given on the command line or through an environment
//! variable.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PORT` | 3000 | Server port |
//! | `HOST` | 0.0.0.0 | Host to bind |
//! | `EREZEPT_LOG_LEVEL` | info | Log level |
//! | `EREZEPT_MAX_BODY_SIZE` | 10485760 | Max request body (bytes) |
//! | `EREZEPT_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `EREZEPT_ENABLE_CORS` | true | Enable CORS |
//! | `EREZEPT_CORS_ORIGINS` | * | Allowed origins |
//! | `EREZEPT_CORS_METHODS` | GET,POST,PUT,DELETE,PATCH,OPTIONS | Allowed methods |
//! | `EREZEPT_CORS_HEADERS` | Content-Type,Authorization | Allowed headers |
//! | `EREZEPT_ENABLE_REQUEST_ID` | true | Set and propagate `x-request-id` |
//! | `EREZEPT_SEED_DEMO_DATA` | true | Load the demo patients, practitioners and prescriptions at startup |
//!
//! # Example
//!
//! ```rust
//! use erezept_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 8080,
//!     seed_demo_data: false,
//!     ..Default::default()
//! };
//! assert_eq!(config.socket_addr(), "0.0.0.0:8080");
//! ```

use std::ffi::OsString;

use clap::Parser;
use tracing::warn;

/// Server configuration for the E-Rezept FHIR API.
#[derive(Debug, Clone, Parser)]
#[command(name = "erezept-server")]
#[command(about = "E-Rezept demo FHIR R4 server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "EREZEPT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "EREZEPT_MAX_BODY_SIZE", default_value = "10485760")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "EREZEPT_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "EREZEPT_ENABLE_CORS", default_value = "true", action = clap::ArgAction::Set)]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "EREZEPT_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "EREZEPT_CORS_METHODS",
        default_value = "GET,POST,PUT,DELETE,PATCH,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "EREZEPT_CORS_HEADERS",
        default_value = "Content-Type,Authorization"
    )]
    pub cors_headers: String,

    /// Enable request ID tracking.
    #[arg(long, env = "EREZEPT_ENABLE_REQUEST_ID", default_value = "true", action = clap::ArgAction::Set)]
    pub enable_request_id: bool,

    /// Load the demo data set at startup.
    #[arg(long, env = "EREZEPT_SEED_DEMO_DATA", default_value = "true", action = clap::ArgAction::Set)]
    pub seed_demo_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            log_level: "info".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,DELETE,PATCH,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization".to_string(),
            enable_request_id: true,
            seed_demo_data: true,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables only.
    ///
    /// The process arguments are not consulted. An unparseable variable is
    /// logged and the defaults are used instead.
    pub fn from_env() -> Self {
        Self::from_args(["erezept-server"])
    }

    /// Parses the given arguments (and the environment), falling back to
    /// [`ServerConfig::default`] with a warning on error.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).unwrap_or_else(|err| {
            warn!(error = %err, "Invalid server configuration, using defaults");
            Self::default()
        })
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.host.trim().is_empty() {
            errors.push("Host cannot be empty".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Uses ephemeral port 0, a short timeout, and starts with empty stores.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            enable_request_id: false,
            seed_demo_data: false,
            ..Default::default()
        }
    }
}
