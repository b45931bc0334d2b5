//! The remote config client contract.
//!
//! This module defines the `ConfigApi` trait - the abstraction over the
//! backend endpoints that drive domain resolution.

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::{AppInfo, ConsoleConfig};

/// Error types for config API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource does not exist (HTTP 404)
    #[error("resource not found")]
    NotFound,

    /// The backend answered with an unexpected HTTP status
    #[error("communication error (HTTP {0})")]
    Communication(u16),

    /// The backend could not be reached
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded
    #[error("could not parse response: {0}")]
    Parse(String),

    /// The base URL is not a valid URL
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Read-only client for the backend's console configuration endpoints.
///
/// All three operations are idempotent and side-effect free. `Ok(None)` and
/// `Err(ApiError::NotFound)` both signal that the resource is absent;
/// callers decide how to fold the two.
#[async_trait]
pub trait ConfigApi: Send + Sync {
    /// Fetch the console configuration for this domain.
    async fn get_console_config(&self) -> Result<Option<ConsoleConfig>, ApiError>;

    /// List the applications served by this domain.
    async fn get_apps(&self) -> Result<Option<Vec<String>>, ApiError>;

    /// Fetch the info record for a single application.
    async fn get_app_info(&self, app_name: &str) -> Result<Option<AppInfo>, ApiError>;
}

/// Factory constructing a [`ConfigApi`] bound to a base URL.
///
/// Injected into the resolution state machine so that tests can substitute
/// a mock client for the HTTP one.
pub type ConfigApiFactory = Box<dyn Fn(&str) -> Result<Arc<dyn ConfigApi>, ApiError> + Send + Sync>;
