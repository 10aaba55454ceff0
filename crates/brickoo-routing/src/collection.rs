//! Named, ordered groups of routes.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{RoutingError, RoutingResult};
use crate::route::Route;

/// An insertion ordered set of routes keyed by name.
///
/// A collection may carry a path prefix. The router skips the whole
/// collection when the request path does not start with it, comparing the
/// way route paths are compared.
#[derive(Debug, Default, Clone)]
pub struct RouteCollection {
    name: Option<String>,
    path: Option<String>,
    routes: IndexMap<String, Arc<dyn Route>>,
}

impl RouteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a named collection without a path prefix.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Creates a collection whose routes share a path prefix.
    pub fn with_path(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            path: Some(path.into()),
            routes: IndexMap::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Adds a route, failing when its name is already taken.
    pub fn add_route(&mut self, route: impl Route + 'static) -> RoutingResult<()> {
        self.add_shared_route(Arc::new(route))
    }

    pub fn add_shared_route(&mut self, route: Arc<dyn Route>) -> RoutingResult<()> {
        if self.routes.contains_key(route.name()) {
            return Err(RoutingError::DuplicateRoute(route.name().to_string()));
        }

        trace!(route = route.name(), path = route.path(), "Route added");
        self.routes.insert(route.name().to_string(), route);
        Ok(())
    }

    /// Adds several routes, stopping at the first duplicate.
    pub fn add_routes<I>(&mut self, routes: I) -> RoutingResult<()>
    where
        I: IntoIterator<Item = Arc<dyn Route>>,
    {
        routes
            .into_iter()
            .try_for_each(|route| self.add_shared_route(route))
    }

    pub fn get_route(&self, name: &str) -> RoutingResult<Arc<dyn Route>> {
        self.routes
            .get(name)
            .cloned()
            .ok_or_else(|| RoutingError::RouteNotFound(name.to_string()))
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    /// Iterates routes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Route>> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::GenericRoute;

    #[test]
    fn test_duplicate_route_is_rejected() {
        let mut collection = RouteCollection::new();
        collection
            .add_route(GenericRoute::new("home", "/", "Home", "index"))
            .unwrap();

        let err = collection
            .add_route(GenericRoute::new("home", "/start", "Home", "start"))
            .unwrap_err();

        assert!(matches!(err, RoutingError::DuplicateRoute(name) if name == "home"));
        assert_eq!(collection.get_route("home").unwrap().path(), "/");
    }

    #[test]
    fn test_add_routes_keeps_order() {
        let mut collection = RouteCollection::new();
        let routes: Vec<Arc<dyn Route>> = vec![
            Arc::new(GenericRoute::new("b", "/b", "C", "b")),
            Arc::new(GenericRoute::new("a", "/a", "C", "a")),
        ];
        collection.add_routes(routes).unwrap();

        let names: Vec<_> = collection.iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_unknown_route() {
        let collection = RouteCollection::new();
        assert!(collection.is_empty());
        assert!(!collection.has_route("missing"));
        assert!(matches!(
            collection.get_route("missing"),
            Err(RoutingError::RouteNotFound(_))
        ));
    }

    #[test]
    fn test_path_prefix() {
        let collection = RouteCollection::with_path("admin", "/admin");
        assert_eq!(collection.name(), Some("admin"));
        assert_eq!(collection.path(), Some("/admin"));
        assert_eq!(RouteCollection::named("blog").path(), None);
        assert_eq!(RouteCollection::new().name(), None);
    }
}
