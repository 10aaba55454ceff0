//! Application wiring.
//!
//! An [`Application`] owns the message dispatcher, the router and the URI
//! builder, all assembled from one [`BrickooConfig`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use brickoo_runtime::Application;
//! use brickoo_routing::RequestInfo;
//!
//! let app = Application::builder()
//!     .config_file("config/brickoo.toml")
//!     .build()?;
//!
//! let route = app.route(&RequestInfo::get("/articles/rust"))?;
//! let uri = app.uri_builder().build("article", [("name", "rust")], None)?;
//! ```
//!
//! # Routing messages
//!
//! Every call to [`Application::route`] notifies listeners:
//!
//! - [`ROUTE_MATCHED`] with `route`, `controller`, `action` and `parameters`
//! - [`NO_ROUTE`] with `method` and `path`

use std::sync::Arc;

use brickoo_messaging::{Message, MessageDispatcher};
use brickoo_routing::{
    RequestDescriptor, RequestRoute, Route, RouteCollection, RoutePathRegexGenerator,
    RouteUriBuilder, Router, RoutingError,
};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::{BrickooConfig, ConfigLoader, RouteConfig, validate_config};
use crate::error::RuntimeResult;
use crate::logging;

/// Message notified after a request was resolved to a route.
pub const ROUTE_MATCHED: &str = "brickoo.routing.route_matched";

/// Message notified when no route accepts a request.
pub const NO_ROUTE: &str = "brickoo.routing.no_route";

/// A configured Brickoo application.
#[derive(Debug)]
pub struct Application {
    config: BrickooConfig,
    dispatcher: Arc<MessageDispatcher>,
    router: Arc<Router>,
    uri_builder: RouteUriBuilder,
}

impl Application {
    /// Creates a builder that loads configuration before assembling.
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    /// Assembles an application from configuration.
    ///
    /// Validates the configuration, initializes logging and compiles every
    /// configured route so broken rules fail here rather than per request.
    pub fn from_config(config: &BrickooConfig) -> RuntimeResult<Self> {
        validate_config(config)?;
        logging::init_from_config(&config.logging);

        let dispatcher = Arc::new(
            MessageDispatcher::builder()
                .max_recursion_depth(config.messaging.max_recursion_depth)
                .build(),
        );

        let generator = RoutePathRegexGenerator::new().with_aliases(
            config
                .routing
                .aliases
                .iter()
                .map(|(path, alias)| (path.clone(), alias.clone())),
        );
        let router = Router::with_generator(generator);
        for collection in build_collections(&config.routing.routes)? {
            router.add_collection(collection)?;
        }
        let router = Arc::new(router);

        let uri_builder = RouteUriBuilder::new(&*config.routing.base_uri, Arc::clone(&router));

        info!(
            routes = router.route_count(),
            max_recursion_depth = config.messaging.max_recursion_depth,
            base_uri = %config.routing.base_uri,
            "Application assembled"
        );

        Ok(Self {
            config: config.clone(),
            dispatcher,
            router,
            uri_builder,
        })
    }

    pub fn config(&self) -> &BrickooConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Arc<MessageDispatcher> {
        &self.dispatcher
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn uri_builder(&self) -> &RouteUriBuilder {
        &self.uri_builder
    }

    /// Registers routes defined in code, after the configured ones.
    pub fn add_collection(&self, collection: RouteCollection) -> RuntimeResult<()> {
        Ok(self.router.add_collection(collection)?)
    }

    /// Resolves a request and notifies listeners of the outcome.
    ///
    /// # Errors
    ///
    /// Returns the routing failure, or the error of a listener reacting to
    /// the routing message.
    pub fn route<R>(&self, request: &R) -> RuntimeResult<RequestRoute>
    where
        R: RequestDescriptor + ?Sized,
    {
        match self.router.get_request_route(request) {
            Ok(request_route) => {
                let route = request_route.route();
                let parameters: Map<String, Value> = request_route
                    .parameters()
                    .iter()
                    .map(|(name, value)| (name.clone(), Value::from(value.as_str())))
                    .collect();

                self.dispatcher.notify(
                    &Message::new(ROUTE_MATCHED)
                        .with_param("route", route.name())
                        .with_param("controller", route.controller())
                        .with_param("action", route.action())
                        .with_param("parameters", parameters),
                )?;
                Ok(request_route)
            }
            Err(err @ RoutingError::RequestHasNoRoute { .. }) => {
                self.dispatcher.notify(
                    &Message::new(NO_ROUTE)
                        .with_param("method", request.request_method())
                        .with_param("path", request.request_path()),
                )?;
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Groups consecutive configured routes sharing a collection key.
///
/// A route listed between two routes of another collection starts a new
/// collection, so the router still tries routes in configuration order.
fn build_collections(routes: &[RouteConfig]) -> RuntimeResult<Vec<RouteCollection>> {
    let mut collections: Vec<(Option<&str>, RouteCollection)> = Vec::new();

    for config in routes {
        let key = config.collection.as_deref();
        if collections.last().is_none_or(|(last, _)| *last != key) {
            collections.push((key, key.map(RouteCollection::named).unwrap_or_default()));
        }
        if let Some((_, collection)) = collections.last_mut() {
            collection.add_route(config.to_route())?;
        }

        debug!(route = %config.name, path = %config.path, "Configured route registered");
    }

    Ok(collections.into_iter().map(|(_, collection)| collection).collect())
}

/// Loads configuration, then assembles an [`Application`].
pub struct ApplicationBuilder {
    config_loader: ConfigLoader,
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    pub fn search_path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: BrickooConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    pub fn build(self) -> RuntimeResult<Application> {
        let config = self.config_loader.load()?;
        Application::from_config(&config)
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
