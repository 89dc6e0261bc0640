//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the observer.
//! All types derive Serde traits for deserialization from config files.
//!
//! Every group field is optional: an unset field inherits the global value,
//! and an unset global falls back to the built-in default. The merge itself
//! happens once, in [`GroupRegistry::from_config`](crate::routing::GroupRegistry::from_config).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::routing::matcher::{ContainsMatcher, RegexMatcher, UrlMatcher};

/// Root configuration for the router observer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ObserverConfig {
    /// Global allow-list. `None` allows every URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelisted_routes: Option<Vec<RouteRule>>,

    /// Global deny-list. `None` denies nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blacklisted_routes: Option<Vec<RouteRule>>,

    /// Global debounce delay in milliseconds (default: 50).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,

    /// Global per-navigation timeout in milliseconds (default: none).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Named groups, in evaluation order. The `default` group is appended after them.
    pub routing_groups: Vec<GroupOptions>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Per-group overrides.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GroupOptions {
    /// Name reported in every event of this group.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelisted_routes: Option<Vec<RouteRule>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blacklisted_routes: Option<Vec<RouteRule>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl GroupOptions {
    /// A group that inherits everything from the globals.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One allow/deny entry.
///
/// A bare string is a substring; a table with `regex` is a pattern:
///
/// ```toml
/// whitelisted_routes = ["/checkout", { regex = "^/orders/\\d+$" }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RouteRule {
    /// URL contains this literal.
    Literal(String),
    /// URL matches this regular expression anywhere.
    Pattern { regex: String },
}

impl RouteRule {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Pattern {
            regex: pattern.into(),
        }
    }

    /// Compile into a runtime matcher.
    pub fn to_matcher(&self) -> Result<Box<dyn UrlMatcher>, regex::Error> {
        match self {
            Self::Literal(v) => Ok(Box::new(ContainsMatcher::new(v.as_str()))),
            Self::Pattern { regex } => RegexMatcher::new(regex).map(|m| Box::new(m) as Box<dyn UrlMatcher>),
        }
    }
}

impl fmt::Display for RouteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(v) => write!(f, "\"{v}\""),
            Self::Pattern { regex } => write!(f, "/{regex}/"),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
