//! # Brickoo Routing
//!
//! Route matching and URI building for the Brickoo framework.
//!
//! This crate provides:
//! - [`Route`] / [`GenericRoute`] / [`HttpRoute`] - named path patterns with
//!   placeholder rules, default values and transport constraints
//! - [`RouteCollection`] - insertion ordered routes, unique by name
//! - [`RoutePathRegexGenerator`] - translation of a route path into one
//!   anchored expression used for matching and validation
//! - [`Router`] - first-match resolution of a [`RequestDescriptor`] into a
//!   [`RequestRoute`], also usable as a `tower::Service`
//! - [`RouteUriBuilder`] - URI generation from a route name and parameters
//!
//! ```text
//! RequestDescriptor ──▶ Router ──▶ RouteCollection* ──▶ Route ──▶ RequestRoute
//!                         │
//!                         └─ RoutePathRegexGenerator ◀── RouteUriBuilder
//! ```

pub mod collection;
pub mod error;
pub mod regex_generator;
pub mod request;
pub mod request_route;
pub mod route;
pub mod router;
pub mod uri_builder;

pub use collection::RouteCollection;
pub use error::{RoutingError, RoutingResult};
pub use regex_generator::{RoutePathRegexGenerator, normalize_path, placeholders};
pub use request::{RequestDescriptor, RequestInfo};
pub use request_route::RequestRoute;
pub use route::{GenericRoute, HttpRoute, Route};
pub use router::Router;
pub use uri_builder::RouteUriBuilder;
