//! Configuration schema definitions.

use std::fmt;
use std::path::PathBuf;

use brickoo_messaging::DEFAULT_MAX_RECURSION_DEPTH;
use brickoo_routing::HttpRoute;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BrickooConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Message dispatcher settings.
    #[serde(default)]
    pub messaging: MessagingConfig,

    /// Router settings and route definitions.
    #[serde(default)]
    pub routing: RoutingConfig,
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Structured JSON lines, requires the `json-log` feature.
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Global log level.
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    /// Target file when `output` is `file`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    #[serde(default)]
    pub span_events: SpanEventConfig,

    /// Include thread ids in log lines.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include source file and line in log lines.
    #[serde(default)]
    pub file_location: bool,

    /// Per-module level overrides, e.g. `brickoo_routing = "trace"`.
    #[serde(default)]
    pub filters: IndexMap<String, LogLevel>,
}

// =============================================================================
// Messaging
// =============================================================================

/// Message dispatcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// How many passes of the same message may be nested.
    #[serde(default = "default_max_recursion_depth")]
    pub max_recursion_depth: usize,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            max_recursion_depth: default_max_recursion_depth(),
        }
    }
}

fn default_max_recursion_depth() -> usize {
    DEFAULT_MAX_RECURSION_DEPTH
}

// =============================================================================
// Routing
// =============================================================================

/// Router configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RoutingConfig {
    /// Prefix prepended to every built URI, e.g. `https://example.com`.
    #[serde(default)]
    pub base_uri: String,

    /// Path aliases, e.g. `articles = "artikeln"`.
    #[serde(default)]
    pub aliases: IndexMap<String, String>,

    /// Route definitions in matching order.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// A single route definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Unique route name.
    pub name: String,

    /// Path pattern with `{placeholder}` tokens.
    pub path: String,

    pub controller: String,

    pub action: String,

    /// Regex rules keyed by placeholder.
    #[serde(default)]
    pub rules: IndexMap<String, String>,

    /// Default values keyed by placeholder.
    #[serde(default)]
    pub defaults: IndexMap<String, String>,

    /// Allowed methods, e.g. `GET|POST`.
    #[serde(default)]
    pub method: Option<String>,

    #[serde(default)]
    pub scheme: Option<String>,

    #[serde(default)]
    pub hostname: Option<String>,

    /// Collection the route is grouped into.
    #[serde(default)]
    pub collection: Option<String>,
}

impl RouteConfig {
    /// Converts the definition into a route.
    pub fn to_route(&self) -> HttpRoute {
        let mut route = HttpRoute::new(&*self.name, &*self.path, &*self.controller, &*self.action);
        for (parameter, rule) in &self.rules {
            route = route.with_rule(parameter.as_str(), rule.as_str());
        }
        for (parameter, value) in &self.defaults {
            route = route.with_default_value(parameter.as_str(), value);
        }
        if let Some(method) = &self.method {
            route = route.with_method(method.as_str());
        }
        if let Some(scheme) = &self.scheme {
            route = route.with_scheme(scheme.as_str());
        }
        if let Some(hostname) = &self.hostname {
            route = route.with_hostname(hostname.as_str());
        }
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickoo_routing::Route;

    #[test]
    fn test_defaults() {
        let config = BrickooConfig::default();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.messaging.max_recursion_depth, 5);
        assert!(config.routing.routes.is_empty());
    }

    #[test]
    fn test_route_config_from_json() {
        let route: RouteConfig = serde_json::from_value(serde_json::json!({
            "name": "article",
            "path": "/articles/{name}/{page}",
            "controller": "Articles",
            "action": "show",
            "rules": { "name": "[a-z\\-]+", "page": "[0-9]+" },
            "defaults": { "page": "1" },
            "method": "GET"
        }))
        .unwrap();

        let route = route.to_route();
        assert_eq!(route.name(), "article");
        assert_eq!(route.rule("page").unwrap(), "[0-9]+");
        assert_eq!(route.default_value("page").unwrap(), "1");
        assert_eq!(route.method(), Some("GET"));
        assert_eq!(route.scheme(), None);
    }

    #[test]
    fn test_log_level_names() {
        let level: LogLevel = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(level, LogLevel::Warn);
        assert_eq!(level.to_string(), "warn");
        assert!(serde_json::from_str::<LogLevel>("\"loud\"").is_err());
    }
}
