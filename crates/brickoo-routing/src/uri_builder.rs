//! Building URIs from named routes.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{RoutingError, RoutingResult};
use crate::regex_generator::{PathSegment, normalize_path, split_path};
use crate::router::Router;

/// Builds request URIs for registered routes.
///
/// Substituted paths are validated against the same expression the router
/// matches with, so a built URI always resolves back to its route.
#[derive(Debug, Clone)]
pub struct RouteUriBuilder {
    base_uri: String,
    router: Arc<Router>,
}

impl RouteUriBuilder {
    pub fn new(base_uri: impl Into<String>, router: Arc<Router>) -> Self {
        Self {
            base_uri: base_uri.into(),
            router,
        }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Builds the URI of `route_name`.
    ///
    /// Placeholders without a supplied value fall back to their defaults.
    /// `query_string` is appended after a `?` when non-empty.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::RouteNotFound`] for an unknown route
    /// - [`RoutingError::RequiredParametersMissing`] when a placeholder has
    ///   neither a value nor a default
    /// - [`RoutingError::PathNotValid`] when the values break the route rules
    pub fn build<I, K, V>(
        &self,
        route_name: &str,
        path_parameters: I,
        query_string: Option<&str>,
    ) -> RoutingResult<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let (route, expression) = self.router.compiled_route(route_name)?;
        let parameters: IndexMap<String, String> = path_parameters
            .into_iter()
            .map(|(k, v)| (k.into(), v.to_string()))
            .collect();

        let template = normalize_path(route.path());
        let segments = split_path(&template);

        let missing: Vec<String> = segments
            .iter()
            .filter_map(|segment| match segment {
                PathSegment::Placeholder(name)
                    if !parameters.contains_key(*name) && !route.has_default_value(name) =>
                {
                    Some(name.to_string())
                }
                _ => None,
            })
            .collect();
        if !missing.is_empty() {
            return Err(RoutingError::RequiredParametersMissing {
                route: route_name.to_string(),
                missing,
            });
        }

        let mut path = String::with_capacity(template.len());
        for segment in &segments {
            match *segment {
                PathSegment::Literal(text) => path.push_str(text),
                PathSegment::Placeholder(name) => match parameters.get(name) {
                    Some(value) => path.push_str(value),
                    None => path.push_str(route.default_value(name)?),
                },
            }
        }

        if !expression.is_match(&path) {
            return Err(RoutingError::PathNotValid {
                route: route_name.to_string(),
                path,
            });
        }

        let mut uri = format!("{}{}", self.base_uri.trim_end_matches('/'), path);
        if let Some(query) = query_string.map(|q| q.trim_start_matches('?')) {
            if !query.is_empty() {
                uri.push('?');
                uri.push_str(query);
            }
        }

        debug!(route = route_name, uri = %uri, "Route uri built");
        Ok(uri)
    }
}
