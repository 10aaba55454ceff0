//! Configuration for the Brickoo runtime.
//!
//! Layered loading through figment, schema types for logging, messaging and
//! routing, and validation of the merged result.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    BrickooConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, MessagingConfig, RouteConfig,
    RoutingConfig, SpanEventConfig,
};
pub use validation::validate_config;
