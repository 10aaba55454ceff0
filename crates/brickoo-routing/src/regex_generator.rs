//! Translation of route path patterns into regular expressions.
//!
//! The generated expression serves both request matching in the
//! [`Router`](crate::Router) and path validation in the
//! [`RouteUriBuilder`](crate::RouteUriBuilder).
//!
//! ```text
//! /articles/{name}/{page}     rules: name=[\w\-]+, page=[0-9]+   default: page=1
//!
//! (?i)^/articles/(?P<name>([\w\-]+))(?:/(?P<page>([0-9]+)))?$
//! ```

use indexmap::IndexMap;
use regex::Regex;
use tracing::trace;

use crate::error::{RoutingError, RoutingResult};
use crate::route::Route;

/// A piece of a route path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathSegment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits a path into literal text and `{placeholder}` tokens.
///
/// Braces that do not enclose a valid identifier stay literal.
pub(crate) fn split_path(path: &str) -> Vec<PathSegment<'_>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(open) = path[cursor..].find('{').map(|i| cursor + i) {
        let Some(close) = path[open..].find('}').map(|i| open + i) else {
            break;
        };

        let name = &path[open + 1..close];
        if is_placeholder_name(name) {
            if literal_start < open {
                segments.push(PathSegment::Literal(&path[literal_start..open]));
            }
            segments.push(PathSegment::Placeholder(name));
            literal_start = close + 1;
            cursor = close + 1;
        } else {
            cursor = open + 1;
        }
    }

    if literal_start < path.len() {
        segments.push(PathSegment::Literal(&path[literal_start..]));
    }
    segments
}

/// Ensures a leading slash and drops trailing slashes; the root stays `/`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Returns the placeholder names of a path in order of appearance.
pub fn placeholders(path: &str) -> Vec<String> {
    split_path(path)
        .into_iter()
        .filter_map(|segment| match segment {
            PathSegment::Placeholder(name) => Some(name.to_string()),
            PathSegment::Literal(_) => None,
        })
        .collect()
}

/// Builds the regular expression of a route path.
#[derive(Debug, Clone, Default)]
pub struct RoutePathRegexGenerator {
    aliases: IndexMap<String, String>,
}

impl RoutePathRegexGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds path aliases, e.g. `articles` → `artikeln`.
    pub fn with_aliases<K, V>(mut self, aliases: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.aliases
            .extend(aliases.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn aliases(&self) -> &IndexMap<String, String> {
        &self.aliases
    }

    /// Generates the anchored, case-insensitive expression for a route.
    pub fn generate(&self, route: &dyn Route) -> String {
        let path = normalize_path(route.path());
        let segments = split_path(&path);
        let alias = self.alias_for(&segments);

        let optional = |segment: Option<&PathSegment<'_>>| {
            matches!(segment, Some(PathSegment::Placeholder(name))
                if route.has_rule(name) && route.has_default_value(name))
        };

        let mut pattern = String::from("(?i)^");
        let mut pending_slash = false;

        for (index, segment) in segments.iter().enumerate() {
            match *segment {
                PathSegment::Literal(text) => {
                    // The slash in front of an optional segment is omitted with it,
                    // unless it is the leading slash of the path.
                    let joins_next = optional(segments.get(index + 1))
                        && text.ends_with('/')
                        && !(index == 0 && text == "/");
                    let text = if joins_next {
                        &text[..text.len() - 1]
                    } else {
                        text
                    };

                    push_literal(&mut pattern, text, alias);
                    pending_slash = joins_next;
                }
                PathSegment::Placeholder(name) => {
                    let slash = if pending_slash { "/" } else { "" };
                    pending_slash = false;

                    match route.rules().get(name) {
                        Some(rule) if route.has_default_value(name) => {
                            pattern.push_str(&format!("(?:{slash}(?P<{name}>({rule})))?"));
                        }
                        Some(rule) => {
                            pattern.push_str(&format!("{slash}(?P<{name}>({rule}))"));
                        }
                        None => {
                            pattern.push_str(slash);
                            pattern.push_str(&regex::escape(&format!("{{{name}}}")));
                        }
                    }
                }
            }
        }

        pattern.push('$');
        trace!(route = route.name(), pattern = %pattern, "Route expression generated");
        pattern
    }

    /// Generates the expression a request path must start with to reach a
    /// collection mounted at `prefix`.
    ///
    /// Like route expressions it ignores case and accepts the aliases, so a
    /// request the routes would match is never filtered out by its prefix.
    pub fn generate_prefix(&self, prefix: &str) -> String {
        let prefix = normalize_path(prefix);
        let alias = self.alias_for(&[PathSegment::Literal(&prefix)]);

        let mut pattern = String::from("(?i)^");
        push_literal(&mut pattern, &prefix, alias);
        pattern
    }

    /// Generates and compiles the expression for a route.
    pub fn compile(&self, route: &dyn Route) -> RoutingResult<Regex> {
        let pattern = self.generate(route);
        Regex::new(&pattern).map_err(|e| RoutingError::InvalidPattern {
            route: route.name().to_string(),
            reason: e.to_string(),
        })
    }

    /// Picks the first alias whose key occurs in the literal parts of the path.
    fn alias_for(&self, segments: &[PathSegment<'_>]) -> Option<(&str, &str)> {
        self.aliases
            .iter()
            .filter(|(key, _)| !key.is_empty())
            .find(|(key, _)| {
                segments.iter().any(|segment| {
                    matches!(segment, PathSegment::Literal(text) if text.contains(key.as_str()))
                })
            })
            .map(|(key, alias)| (key.as_str(), alias.as_str()))
    }
}

fn push_literal(pattern: &mut String, text: &str, alias: Option<(&str, &str)>) {
    match alias {
        Some((key, alias)) if text.contains(key) => {
            let group = format!("({}|{})", regex::escape(key), regex::escape(alias));
            let escaped: Vec<String> = text.split(key).map(regex::escape).collect();
            pattern.push_str(&escaped.join(group.as_str()));
        }
        _ => pattern.push_str(&regex::escape(text)),
    }
}
