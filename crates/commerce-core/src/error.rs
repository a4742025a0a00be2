//! Error types for client construction and service calls.

use std::path::PathBuf;

use commerce_http::FetchError;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Structural problems with a provider configuration.
///
/// Raised before any factory runs or any request is sent.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: provider")]
    MissingProvider,

    #[error("Missing required field: base_url")]
    MissingBaseUrl,

    #[error("Invalid base_url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid timeout {0}ms: must be greater than zero")]
    InvalidTimeout(i64),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Failed to read config file {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {origin}: {message}")]
    Parse { origin: String, message: String },
}

/// Errors surfaced by the commerce client layer.
///
/// Each failure mode is a separate variant so callers can tell them apart
/// without inspecting messages.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Provider \"{requested}\" is not registered. Registered providers: {available}")]
    ProviderNotRegistered { requested: String, available: String },

    #[error("API client not initialized: call initialize() or create_named() first")]
    NotInitialized,

    #[error("No API client registered under name \"{0}\"")]
    ClientNotFound(String),

    /// Transport or HTTP status failure, passed through untouched.
    #[error(transparent)]
    Http(#[from] FetchError),

    #[error("Reservation {reservation_id} cannot be {action}: {reason}")]
    ReservationState {
        reservation_id: String,
        action: String,
        reason: String,
    },

    #[error("Job {job_id} cannot be {action} while {status}")]
    JobState {
        job_id: String,
        action: String,
        status: String,
    },

    #[error("Operation not supported by this provider: {0}")]
    Unsupported(String),

    #[error("Failed to map provider response: {0}")]
    Mapping(String),
}

impl ApiError {
    /// HTTP status code of the underlying response, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the backend answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
