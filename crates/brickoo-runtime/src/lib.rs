//! Brickoo Runtime - configuration, logging and wiring for Brickoo applications.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`, `BrickooConfig`)
//! - Logging configuration (`LoggingBuilder`)
//! - Application assembly (`Application`): a message dispatcher, a router
//!   with the configured routes and aliases, and a URI builder
//!
//! ```ignore
//! use brickoo_runtime::Application;
//! use brickoo_routing::RequestInfo;
//!
//! fn main() -> brickoo_runtime::RuntimeResult<()> {
//!     let app = Application::builder().profile("production").build()?;
//!
//!     let route = app.route(&RequestInfo::get("/articles/rust"))?;
//!     println!("{} -> {}::{}", route.route().name(), route.route().controller(), route.route().action());
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod config;
pub mod error;
pub mod logging;

// Re-exports
pub use application::{Application, ApplicationBuilder, NO_ROUTE, ROUTE_MATCHED};
pub use config::{BrickooConfig, ConfigError, ConfigLoader, ConfigResult, RouteConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
