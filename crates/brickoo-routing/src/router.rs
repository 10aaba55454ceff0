//! Request to route resolution.
//!
//! The [`Router`] walks its collections in registration order and returns the
//! first route whose path expression and transport constraints accept the
//! request.
//!
//! # Tower integration
//!
//! `Router` implements `tower::Service<R>` for every [`RequestDescriptor`],
//! so route resolution can sit behind Tower middleware:
//!
//! ```rust,ignore
//! use tower::ServiceExt;
//!
//! let route = router.oneshot(RequestInfo::get("/articles/rust")).await?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::{Ready, ready};
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::RwLock;
use regex::Regex;
use tower::Service;
use tracing::{debug, trace};

use crate::collection::RouteCollection;
use crate::error::{RoutingError, RoutingResult};
use crate::regex_generator::{RoutePathRegexGenerator, normalize_path};
use crate::request::RequestDescriptor;
use crate::request_route::RequestRoute;
use crate::route::Route;

/// Resolves requests to routes.
///
/// Route and prefix expressions are compiled when a collection is added, so
/// resolving a request only runs the compiled expressions.
pub struct Router {
    generator: RoutePathRegexGenerator,
    collections: RwLock<Vec<RegisteredCollection>>,
    /// Compiled expressions keyed by their pattern string.
    cache: RwLock<HashMap<String, Arc<Regex>>>,
}

/// A collection together with its compiled expressions.
struct RegisteredCollection {
    collection: RouteCollection,
    prefix: Option<Arc<Regex>>,
    routes: Vec<(Arc<dyn Route>, Arc<Regex>)>,
}

impl RegisteredCollection {
    fn accepts_path(&self, path: &str) -> bool {
        self.prefix.as_ref().is_none_or(|prefix| prefix.is_match(path))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let collections = self.collections.read().len();
        let cached = self.cache.read().len();
        f.debug_struct("Router")
            .field("collections", &collections)
            .field("routes", &self.route_count())
            .field("cached_patterns", &cached)
            .finish()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::with_generator(RoutePathRegexGenerator::new())
    }

    /// Creates a router that generates path expressions with `generator`.
    pub fn with_generator(generator: RoutePathRegexGenerator) -> Self {
        Self {
            generator,
            collections: RwLock::new(Vec::new()),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn generator(&self) -> &RoutePathRegexGenerator {
        &self.generator
    }

    /// Compiles and appends a collection; earlier collections win on
    /// overlapping routes.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidPattern`] if a route rule does not
    /// compile. The router is left unchanged.
    pub fn add_collection(&self, collection: RouteCollection) -> RoutingResult<()> {
        let name = collection.name().unwrap_or("default");

        let prefix = match collection.path() {
            None | Some("") | Some("/") => None,
            Some(path) => {
                let pattern = self.generator.generate_prefix(path);
                Some(self.cached(&pattern, || compile_pattern(name, &pattern))?)
            }
        };

        let routes = collection
            .iter()
            .map(|route| Ok((Arc::clone(route), self.compiled(route.as_ref())?)))
            .collect::<RoutingResult<Vec<_>>>()?;

        debug!(collection = name, routes = routes.len(), "Route collection added");
        self.collections.write().push(RegisteredCollection {
            collection,
            prefix,
            routes,
        });
        Ok(())
    }

    pub fn route_count(&self) -> usize {
        self.collections
            .read()
            .iter()
            .map(|entry| entry.collection.len())
            .sum()
    }

    /// Looks a route up by name across all collections.
    pub fn get_route(&self, name: &str) -> RoutingResult<Arc<dyn Route>> {
        self.collections
            .read()
            .iter()
            .find_map(|entry| entry.collection.get_route(name).ok())
            .ok_or_else(|| RoutingError::RouteNotFound(name.to_string()))
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.collections
            .read()
            .iter()
            .any(|entry| entry.collection.has_route(name))
    }

    /// Returns a registered route with the expression compiled for it.
    pub fn compiled_route(&self, name: &str) -> RoutingResult<(Arc<dyn Route>, Arc<Regex>)> {
        self.collections
            .read()
            .iter()
            .flat_map(|entry| entry.routes.iter())
            .find(|(route, _)| route.name() == name)
            .map(|(route, regex)| (Arc::clone(route), Arc::clone(regex)))
            .ok_or_else(|| RoutingError::RouteNotFound(name.to_string()))
    }

    /// Returns the compiled path expression of any route, registered or not.
    pub fn compiled(&self, route: &dyn Route) -> RoutingResult<Arc<Regex>> {
        let pattern = self.generator.generate(route);
        self.cached(&pattern, || compile_pattern(route.name(), &pattern))
    }

    /// Checks whether a route accepts the request.
    pub fn is_request_route<R>(&self, route: &dyn Route, request: &R) -> RoutingResult<bool>
    where
        R: RequestDescriptor + ?Sized,
    {
        if !self.constraints_match(route, request)? {
            return Ok(false);
        }

        let path = normalize_path(request.request_path());
        Ok(self.compiled(route)?.is_match(&path))
    }

    /// Returns the first route matching the request.
    pub fn get_request_route<R>(&self, request: &R) -> RoutingResult<RequestRoute>
    where
        R: RequestDescriptor + ?Sized,
    {
        let path = normalize_path(request.request_path());
        let collections = self.collections.read();

        for entry in collections.iter().filter(|entry| entry.accepts_path(&path)) {
            for (route, regex) in &entry.routes {
                if !self.constraints_match(route.as_ref(), request)? {
                    continue;
                }

                if let Some(captures) = regex.captures(&path) {
                    debug!(
                        route = route.name(),
                        method = request.request_method(),
                        path = %path,
                        "Request route matched"
                    );
                    return Ok(RequestRoute::from_captures(Arc::clone(route), &captures));
                }
            }
        }

        debug!(
            method = request.request_method(),
            path = %path,
            "No route matches request"
        );
        Err(RoutingError::RequestHasNoRoute {
            method: request.request_method().to_string(),
            path: request.request_path().to_string(),
        })
    }

    fn constraints_match<R>(&self, route: &dyn Route, request: &R) -> RoutingResult<bool>
    where
        R: RequestDescriptor + ?Sized,
    {
        let checks = [
            (route.method(), Some(request.request_method())),
            (route.scheme(), request.scheme()),
            (route.hostname(), request.hostname()),
        ];

        for (constraint, value) in checks {
            let Some(constraint) = constraint else {
                continue;
            };
            let Some(value) = value else {
                trace!(route = route.name(), constraint, "Request lacks constrained value");
                return Ok(false);
            };
            if !self.constraint_regex(route, constraint)?.is_match(value) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn constraint_regex(&self, route: &dyn Route, constraint: &str) -> RoutingResult<Arc<Regex>> {
        let pattern = format!("(?i)^(?:{constraint})$");
        self.cached(&pattern, || compile_pattern(route.name(), &pattern))
    }

    fn cached<F>(&self, pattern: &str, compile: F) -> RoutingResult<Arc<Regex>>
    where
        F: FnOnce() -> RoutingResult<Regex>,
    {
        if let Some(regex) = self.cache.read().get(pattern) {
            return Ok(Arc::clone(regex));
        }

        let regex = Arc::new(compile()?);
        self.cache
            .write()
            .insert(pattern.to_string(), Arc::clone(&regex));
        Ok(regex)
    }
}

fn compile_pattern(owner: &str, pattern: &str) -> RoutingResult<Regex> {
    Regex::new(pattern).map_err(|e| RoutingError::InvalidPattern {
        route: owner.to_string(),
        reason: e.to_string(),
    })
}

impl<R: RequestDescriptor> Service<R> for Router {
    type Response = RequestRoute;
    type Error = RoutingError;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: R) -> Self::Future {
        ready(self.get_request_route(&request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestInfo;
    use crate::route::{GenericRoute, HttpRoute};
    use tower::ServiceExt;

    fn router() -> Router {
        let mut collection = RouteCollection::new();
        collection
            .add_route(
                HttpRoute::new("article", "/articles/{name}", "Articles", "show")
                    .with_rule("name", r"[\w\-]+")
                    .with_method("GET|HEAD"),
            )
            .unwrap();
        collection
            .add_route(
                HttpRoute::new("article.update", "/articles/{name}", "Articles", "update")
                    .with_rule("name", r"[\w\-]+")
                    .with_method("POST"),
            )
            .unwrap();
        collection
            .add_route(GenericRoute::new("home", "/", "Home", "index"))
            .unwrap();

        let router = Router::new();
        router.add_collection(collection).unwrap();
        router
    }

    #[test]
    fn test_matches_by_method() {
        let router = router();

        let route = router
            .get_request_route(&RequestInfo::get("/articles/rust-ownership"))
            .unwrap();
        assert_eq!(route.route().name(), "article");
        assert_eq!(route.parameter("name").unwrap(), "rust-ownership");

        let route = router
            .get_request_route(&RequestInfo::new("post", "/articles/rust-ownership/"))
            .unwrap();
        assert_eq!(route.route().name(), "article.update");
    }

    #[test]
    fn test_no_route() {
        let router = router();
        let err = router
            .get_request_route(&RequestInfo::new("DELETE", "/articles/rust"))
            .unwrap_err();

        assert!(matches!(
            err,
            RoutingError::RequestHasNoRoute { method, path } if method == "DELETE" && path == "/articles/rust"
        ));
    }

    #[test]
    fn test_is_request_route() {
        let router = router();
        let home = router.get_route("home").unwrap();

        assert!(router.is_request_route(home.as_ref(), &RequestInfo::get("/")).unwrap());
        assert!(!router.is_request_route(home.as_ref(), &RequestInfo::get("/x")).unwrap());
    }

    #[test]
    fn test_scheme_and_hostname_constraints() {
        let mut collection = RouteCollection::new();
        collection
            .add_route(
                HttpRoute::new("secure", "/account", "Account", "show")
                    .with_scheme("https")
                    .with_hostname(r"([a-z]+\.)?example\.com"),
            )
            .unwrap();
        let router = Router::new();
        router.add_collection(collection).unwrap();

        let matching = RequestInfo::get("/account")
            .with_scheme("HTTPS")
            .with_hostname("shop.example.com");
        assert!(router.get_request_route(&matching).is_ok());

        let plain = RequestInfo::get("/account")
            .with_scheme("http")
            .with_hostname("example.com");
        assert!(router.get_request_route(&plain).is_err());

        assert!(router.get_request_route(&RequestInfo::get("/account")).is_err());
    }

    #[test]
    fn test_collection_prefix_is_respected() {
        let mut admin = RouteCollection::with_path("admin", "/admin");
        admin
            .add_route(GenericRoute::new("admin.users", "/admin/users", "Admin", "users"))
            .unwrap();
        let router = Router::new();
        router.add_collection(admin).unwrap();

        assert!(router.get_request_route(&RequestInfo::get("/admin/users")).is_ok());
        assert!(router.has_route("admin.users"));
        assert!(matches!(
            router.get_route("missing"),
            Err(RoutingError::RouteNotFound(_))
        ));
    }

    #[test]
    fn test_collection_prefix_follows_aliases_and_case() {
        let mut articles = RouteCollection::with_path("articles", "/articles");
        articles
            .add_route(
                GenericRoute::new("article", "/articles/{name}", "Articles", "show")
                    .with_rule("name", r"[\w\-]+"),
            )
            .unwrap();
        let router = Router::with_generator(
            RoutePathRegexGenerator::new().with_aliases([("articles", "artikeln")]),
        );
        router.add_collection(articles).unwrap();

        for path in ["/artikeln/rust", "/ARTICLES/rust"] {
            let request = RequestInfo::get(path);
            let article = router.get_route("article").unwrap();
            assert!(router.is_request_route(article.as_ref(), &request).unwrap());

            let route = router.get_request_route(&request).unwrap();
            assert_eq!(route.route().name(), "article");
            assert_eq!(route.parameter("name").unwrap(), "rust");
        }
        assert!(router.get_request_route(&RequestInfo::get("/blog/rust")).is_err());
    }

    #[test]
    fn test_invalid_rule_rejects_collection() {
        let mut collection = RouteCollection::new();
        collection
            .add_route(
                GenericRoute::new("item", "/items/{id}", "Items", "show").with_rule("id", "[0-9"),
            )
            .unwrap();
        let router = Router::new();

        assert!(matches!(
            router.add_collection(collection),
            Err(RoutingError::InvalidPattern { route, .. }) if route == "item"
        ));
        assert_eq!(router.route_count(), 0);
    }

    #[test]
    fn test_registered_expression_is_reused() {
        let router = router();
        let (home, registered) = router.compiled_route("home").unwrap();

        assert_eq!(home.name(), "home");
        assert!(Arc::ptr_eq(&registered, &router.compiled(home.as_ref()).unwrap()));
        assert!(matches!(
            router.compiled_route("missing"),
            Err(RoutingError::RouteNotFound(_))
        ));
    }

    #[test]
    fn test_compiled_patterns_are_cached() {
        let router = router();
        let home = router.get_route("home").unwrap();

        let first = router.compiled(home.as_ref()).unwrap();
        let second = router.compiled(home.as_ref()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_service_resolves_route() {
        let route = tokio_test::block_on(router().oneshot(RequestInfo::get("/"))).unwrap();
        assert_eq!(route.route().name(), "home");

        let err = tokio_test::block_on(router().oneshot(RequestInfo::get("/nowhere"))).unwrap_err();
        assert!(matches!(err, RoutingError::RequestHasNoRoute { .. }));
    }
}
