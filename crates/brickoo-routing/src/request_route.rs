//! The result of matching a request against a route.

use std::sync::Arc;

use indexmap::IndexMap;
use regex::Captures;

use crate::error::{RoutingError, RoutingResult};
use crate::route::Route;

/// A matched route together with its resolved path parameters.
#[derive(Debug, Clone)]
pub struct RequestRoute {
    route: Arc<dyn Route>,
    parameters: IndexMap<String, String>,
}

impl RequestRoute {
    pub fn new(route: Arc<dyn Route>, parameters: IndexMap<String, String>) -> Self {
        Self { route, parameters }
    }

    /// Resolves parameters from the route defaults and the path captures.
    ///
    /// Every default value is taken first. A named group that took part in
    /// the match overrides its default.
    pub(crate) fn from_captures(route: Arc<dyn Route>, captures: &Captures<'_>) -> Self {
        let mut parameters = route.default_values().clone();

        for name in route.rules().keys() {
            if let Some(value) = captures.name(name) {
                parameters.insert(name.clone(), value.as_str().to_string());
            }
        }

        Self::new(route, parameters)
    }

    pub fn route(&self) -> &Arc<dyn Route> {
        &self.route
    }

    pub fn parameters(&self) -> &IndexMap<String, String> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> RoutingResult<&str> {
        self.parameters
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| RoutingError::ParameterNotAvailable(name.to_string()))
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoutePathRegexGenerator;
    use crate::route::GenericRoute;

    #[test]
    fn test_captures_override_defaults() {
        let route: Arc<dyn Route> = Arc::new(
            GenericRoute::new("list", "/list/{page}/{sort}", "List", "index")
                .with_rule("page", "[0-9]+")
                .with_rule("sort", "asc|desc")
                .with_default_value("page", 1)
                .with_default_value("sort", "asc"),
        );
        let regex = RoutePathRegexGenerator::new().compile(route.as_ref()).unwrap();

        let captures = regex.captures("/list/4").unwrap();
        let request_route = RequestRoute::from_captures(Arc::clone(&route), &captures);

        assert_eq!(request_route.parameter("page").unwrap(), "4");
        assert_eq!(request_route.parameter("sort").unwrap(), "asc");
        assert!(request_route.has_parameter("sort"));
        assert_eq!(request_route.route().name(), "list");
    }

    #[test]
    fn test_unknown_parameter() {
        let route: Arc<dyn Route> = Arc::new(GenericRoute::new("home", "/", "Home", "index"));
        let request_route = RequestRoute::new(route, IndexMap::new());

        assert!(matches!(
            request_route.parameter("id"),
            Err(RoutingError::ParameterNotAvailable(name)) if name == "id"
        ));
    }
}
