//! Route definitions.
//!
//! A route binds a path pattern such as `/articles/{name}` to a controller and
//! action. Placeholders are constrained by rules (regex fragments) and may
//! carry default values, which makes the matching path segment optional.

use std::fmt::Debug;

use indexmap::IndexMap;

use crate::error::{RoutingError, RoutingResult};

/// A named path pattern bound to a controller action.
pub trait Route: Send + Sync + Debug {
    /// Unique name of the route.
    fn name(&self) -> &str;

    /// Path pattern with `{placeholder}` tokens.
    fn path(&self) -> &str;

    fn controller(&self) -> &str;

    fn action(&self) -> &str;

    /// Regex rules keyed by placeholder name.
    fn rules(&self) -> &IndexMap<String, String>;

    /// Default values keyed by placeholder name.
    fn default_values(&self) -> &IndexMap<String, String>;

    /// Returns the rule for a placeholder.
    fn rule(&self, parameter: &str) -> RoutingResult<&str> {
        self.rules()
            .get(parameter)
            .map(String::as_str)
            .ok_or_else(|| RoutingError::rule_not_found(self.name(), parameter))
    }

    fn has_rule(&self, parameter: &str) -> bool {
        self.rules().contains_key(parameter)
    }

    /// Returns the default value of a placeholder.
    fn default_value(&self, parameter: &str) -> RoutingResult<&str> {
        self.default_values()
            .get(parameter)
            .map(String::as_str)
            .ok_or_else(|| RoutingError::default_value_not_found(self.name(), parameter))
    }

    fn has_default_value(&self, parameter: &str) -> bool {
        self.default_values().contains_key(parameter)
    }

    /// Allowed request methods as a regex alternation, e.g. `GET|POST`.
    fn method(&self) -> Option<&str> {
        None
    }

    /// Allowed request schemes as a regex alternation, e.g. `https?`.
    fn scheme(&self) -> Option<&str> {
        None
    }

    /// Allowed hostnames as a regex pattern.
    fn hostname(&self) -> Option<&str> {
        None
    }
}

/// A route without transport constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericRoute {
    name: String,
    path: String,
    controller: String,
    action: String,
    rules: IndexMap<String, String>,
    default_values: IndexMap<String, String>,
}

impl GenericRoute {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            controller: controller.into(),
            action: action.into(),
            rules: IndexMap::new(),
            default_values: IndexMap::new(),
        }
    }

    /// Constrains a placeholder with a regex fragment.
    pub fn with_rule(mut self, parameter: impl Into<String>, rule: impl Into<String>) -> Self {
        self.rules.insert(parameter.into(), rule.into());
        self
    }

    /// Sets several rules at once.
    pub fn with_rules<K, V>(mut self, rules: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.rules
            .extend(rules.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Makes a placeholder optional, falling back to `value`.
    pub fn with_default_value(mut self, parameter: impl Into<String>, value: impl ToString) -> Self {
        self.default_values
            .insert(parameter.into(), value.to_string());
        self
    }

    /// Sets several default values at once.
    pub fn with_default_values<K, V>(mut self, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.default_values
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }
}

impl Route for GenericRoute {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn controller(&self) -> &str {
        &self.controller
    }

    fn action(&self) -> &str {
        &self.action
    }

    fn rules(&self) -> &IndexMap<String, String> {
        &self.rules
    }

    fn default_values(&self) -> &IndexMap<String, String> {
        &self.default_values
    }
}

/// A route that additionally constrains method, scheme and hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRoute {
    inner: GenericRoute,
    method: Option<String>,
    scheme: Option<String>,
    hostname: Option<String>,
}

impl HttpRoute {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self::from(GenericRoute::new(name, path, controller, action))
    }

    pub fn with_rule(mut self, parameter: impl Into<String>, rule: impl Into<String>) -> Self {
        self.inner = self.inner.with_rule(parameter, rule);
        self
    }

    pub fn with_default_value(mut self, parameter: impl Into<String>, value: impl ToString) -> Self {
        self.inner = self.inner.with_default_value(parameter, value);
        self
    }

    /// Restricts the route to the given methods, e.g. `GET|HEAD`.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Restricts the route to the given schemes, e.g. `https`.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Restricts the route to matching hostnames.
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }
}

impl From<GenericRoute> for HttpRoute {
    fn from(inner: GenericRoute) -> Self {
        Self {
            inner,
            method: None,
            scheme: None,
            hostname: None,
        }
    }
}

impl Route for HttpRoute {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn path(&self) -> &str {
        self.inner.path()
    }

    fn controller(&self) -> &str {
        self.inner.controller()
    }

    fn action(&self) -> &str {
        self.inner.action()
    }

    fn rules(&self) -> &IndexMap<String, String> {
        self.inner.rules()
    }

    fn default_values(&self) -> &IndexMap<String, String> {
        self.inner.default_values()
    }

    fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }
}
