//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BrickooConfig, LogOutput, LoggingConfig, RouteConfig, RoutingConfig};
use std::collections::HashSet;

/// Validates the entire configuration.
pub fn validate_config(config: &BrickooConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;

    if config.messaging.max_recursion_depth == 0 {
        return Err(ConfigError::validation(
            "Max recursion depth must be greater than 0",
        ));
    }

    validate_routing_config(&config.routing)?;
    Ok(())
}

/// Validates logging configuration.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if let Some(module) = logging.filters.keys().find(|m| m.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Invalid log filter target: '{module}'"
        )));
    }

    Ok(())
}

/// Validates aliases and route definitions.
fn validate_routing_config(routing: &RoutingConfig) -> ConfigResult<()> {
    for (path, alias) in &routing.aliases {
        if path.is_empty() || alias.is_empty() {
            return Err(ConfigError::validation(format!(
                "Route alias '{path}' -> '{alias}' must not be empty"
            )));
        }
    }

    let mut seen_names = HashSet::new();
    for route in &routing.routes {
        if !seen_names.insert(route.name.as_str()) {
            return Err(ConfigError::DuplicateRoute(route.name.clone()));
        }

        validate_route_config(route)?;
    }

    Ok(())
}

/// Validates a single route definition.
fn validate_route_config(route: &RouteConfig) -> ConfigResult<()> {
    if route.name.is_empty() {
        return Err(ConfigError::missing_field("route.name"));
    }

    if route.controller.is_empty() {
        return Err(ConfigError::missing_field("route.controller"));
    }

    if !route.path.starts_with('/') {
        return Err(ConfigError::InvalidRoutePath {
            route: route.name.clone(),
            path: route.path.clone(),
        });
    }

    Ok(())
}
