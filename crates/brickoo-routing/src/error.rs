//! Error types for the routing layer.

use thiserror::Error;

/// Errors that can occur while registering, matching or building routes.
#[derive(Debug, Clone, Error)]
pub enum RoutingError {
    /// No route is registered under the given name.
    #[error("route '{0}' not found")]
    RouteNotFound(String),

    /// A route with the same name is already part of the collection.
    #[error("route '{0}' is already registered")]
    DuplicateRoute(String),

    /// No registered route matches the request.
    #[error("no route matches {method} '{path}'")]
    RequestHasNoRoute {
        /// The request method.
        method: String,
        /// The request path.
        path: String,
    },

    /// The matched route has no parameter with the given name.
    #[error("request route parameter '{0}' is not available")]
    ParameterNotAvailable(String),

    /// The route declares no rule for the given placeholder.
    #[error("route '{route}' has no rule for '{parameter}'")]
    RuleNotFound {
        /// The route name.
        route: String,
        /// The placeholder name.
        parameter: String,
    },

    /// The route declares no default value for the given placeholder.
    #[error("route '{route}' has no default value for '{parameter}'")]
    DefaultValueNotFound {
        /// The route name.
        route: String,
        /// The placeholder name.
        parameter: String,
    },

    /// A built path does not satisfy the route rules.
    #[error("path '{path}' is not valid for route '{route}'")]
    PathNotValid {
        /// The route name.
        route: String,
        /// The substituted path.
        path: String,
    },

    /// Required placeholders had no value when building a URI.
    #[error("route '{route}' is missing required parameters: {}", missing.join(", "))]
    RequiredParametersMissing {
        /// The route name.
        route: String,
        /// The placeholders without value, in path order.
        missing: Vec<String>,
    },

    /// The generated route expression is not a valid regex.
    #[error("route '{route}' produces an invalid pattern: {reason}")]
    InvalidPattern {
        /// The route name.
        route: String,
        /// The regex compiler message.
        reason: String,
    },
}

impl RoutingError {
    /// Creates a rule-not-found error.
    pub fn rule_not_found(route: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::RuleNotFound {
            route: route.into(),
            parameter: parameter.into(),
        }
    }

    /// Creates a default-value-not-found error.
    pub fn default_value_not_found(
        route: impl Into<String>,
        parameter: impl Into<String>,
    ) -> Self {
        Self::DefaultValueNotFound {
            route: route.into(),
            parameter: parameter.into(),
        }
    }
}

/// Result type for routing operations.
pub type RoutingResult<T> = Result<T, RoutingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameters_message() {
        let err = RoutingError::RequiredParametersMissing {
            route: "articles".to_string(),
            missing: vec!["articleName".to_string(), "version".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "route 'articles' is missing required parameters: articleName, version"
        );
    }
}
