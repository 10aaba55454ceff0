//! # Brickoo
//!
//! Message dispatching and request routing for web applications.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌────────┐     ┌──────────────┐
//! │   Request   │────▶│ Router │────▶│ RequestRoute │
//! └─────────────┘     └────────┘     └──────┬───────┘
//!                                           │ route_matched / no_route
//!                                           ▼
//!                              ┌───────────────────┐     ┌────────────────┐
//!                              │ MessageDispatcher │────▶│ Listener (p=N) │
//!                              └───────────────────┘     └────────────────┘
//! ```
//!
//! - **Messaging**: named messages delivered to listeners in priority order,
//!   with conditions, cooperative stop and recursion protection
//! - **Routing**: path patterns with placeholder rules and defaults, compiled
//!   to one expression used for both matching and URI building
//! - **Runtime**: layered configuration, logging and application assembly
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use brickoo::prelude::*;
//!
//! fn main() -> RuntimeResult<()> {
//!     let app = Application::builder().build()?;
//!
//!     app.dispatcher().attach(
//!         MessageListener::new(ROUTE_MATCHED, |message, _| {
//!             info!(route = ?message.param("route"), "Routed");
//!             Ok(None)
//!         })
//!         .priority(10),
//!     );
//!
//!     let route = app.route(&RequestInfo::get("/articles/rust"))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use brickoo_messaging as messaging;
pub use brickoo_routing as routing;
pub use brickoo_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use brickoo::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use brickoo_runtime::{
        Application, BrickooConfig, ConfigLoader, NO_ROUTE, ROUTE_MATCHED, RuntimeError,
        RuntimeResult,
    };

    // Messaging
    pub use brickoo_messaging::{
        Listener, ListenerAggregate, ListenerResult, Message, MessageDispatcher, MessageListener,
        MessagingError, MessagingResult,
    };

    // Routing
    pub use brickoo_routing::{
        GenericRoute, HttpRoute, RequestDescriptor, RequestInfo, RequestRoute, Route,
        RouteCollection, RouteUriBuilder, Router, RoutingError,
    };

    // Logging macros
    pub use brickoo_runtime::prelude::*;
}
