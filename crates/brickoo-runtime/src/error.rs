//! Runtime error types.

use brickoo_messaging::MessagingError;
use brickoo_routing::RoutingError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while assembling or running an application.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Loading or validating configuration failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A message dispatch failed.
    #[error("Messaging error: {0}")]
    Messaging(#[from] MessagingError),

    /// Route registration, matching or URI building failed.
    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
