//! Error types for the persistence layer.
//!
//! A missing resource is never an error here: lookups return `Option` and
//! deletes return `bool`. Errors cover input that cannot be mapped onto a
//! resource model and failures reported by a storage backend.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors related to resource input.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The JSON has no `resourceType` string.
    #[error("missing resourceType")]
    MissingResourceType,

    /// The JSON does not match the resource model.
    #[error("invalid {resource_type} resource: {message}")]
    InvalidResource {
        resource_type: String,
        message: String,
    },
}

/// Errors originating from the storage backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
    },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Wraps a JSON shape error for the given resource type.
    pub fn invalid_resource(resource_type: &str, err: serde_json::Error) -> Self {
        StorageError::Validation(ValidationError::InvalidResource {
            resource_type: resource_type.to_string(),
            message: err.to_string(),
        })
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}
