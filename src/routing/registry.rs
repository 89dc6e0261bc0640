//! Group registry.
//!
//! # Responsibilities
//! - Resolve every group's rules, delay and timeout (group → global → default)
//! - Compile rule entries into matchers
//! - Append the implicit `default` group last
//!
//! # Design Decisions
//! - Built once; resolution is never re-evaluated
//! - Order is configuration order, which is also event emission order
//! - Duplicate names are kept as independent groups

use std::time::Duration;

use crate::config::loader::ConfigError;
use crate::config::schema::{GroupOptions, ObserverConfig, RouteRule};
use crate::routing::group::{GroupConfig, RoutingGroup, DEFAULT_DELAY, DEFAULT_GROUP_NAME};
use crate::routing::matcher::{RuleSet, UrlMatcher};

/// Ordered collection of routing groups owned by the observer.
#[derive(Debug)]
pub struct GroupRegistry {
    groups: Vec<RoutingGroup>,
}

fn compile_rules(
    group: &str,
    rules: Option<&Vec<RouteRule>>,
) -> Result<Option<Vec<Box<dyn UrlMatcher>>>, ConfigError> {
    rules
        .map(|list| {
            list.iter()
                .map(|rule| {
                    rule.to_matcher().map_err(|source| ConfigError::InvalidPattern {
                        group: group.to_string(),
                        pattern: rule.to_string(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()
}

/// Merge one group's options with the globals into a resolved config.
fn resolve(options: &GroupOptions, globals: &ObserverConfig) -> Result<GroupConfig, ConfigError> {
    let allow = options
        .whitelisted_routes
        .as_ref()
        .or(globals.whitelisted_routes.as_ref());
    let deny = options
        .blacklisted_routes
        .as_ref()
        .or(globals.blacklisted_routes.as_ref());

    let delay = options
        .delay_ms
        .or(globals.delay_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_DELAY);
    let timeout = options
        .timeout_ms
        .or(globals.timeout_ms)
        .map(Duration::from_millis);

    let rules = RuleSet::new(
        compile_rules(&options.name, allow)?,
        compile_rules(&options.name, deny)?,
    );

    Ok(GroupConfig::new(options.name.clone())
        .with_rules(rules)
        .with_delay(delay)
        .with_timeout(timeout))
}

impl GroupRegistry {
    /// Build from already resolved group configs. No default group is added.
    pub fn new(configs: Vec<GroupConfig>) -> Self {
        Self {
            groups: configs.into_iter().map(RoutingGroup::new).collect(),
        }
    }

    /// Resolve every configured group, then append the `default` group.
    pub fn from_config(config: &ObserverConfig) -> Result<Self, ConfigError> {
        let default_group = GroupOptions::named(DEFAULT_GROUP_NAME);
        let configs = config
            .routing_groups
            .iter()
            .chain(std::iter::once(&default_group))
            .map(|options| resolve(options, config))
            .collect::<Result<Vec<_>, _>>()?;

        for group in &configs {
            tracing::debug!(
                group = %group.name,
                delay_ms = group.delay.as_millis() as u64,
                timeout_ms = group.timeout.map(|t| t.as_millis() as u64),
                "Routing group resolved"
            );
        }

        Ok(Self::new(configs))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RoutingGroup> {
        self.groups.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut RoutingGroup> {
        self.groups.get_mut(index)
    }

    /// First group with this name.
    pub fn find(&self, name: &str) -> Option<&RoutingGroup> {
        self.groups.iter().find(|g| g.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoutingGroup> {
        self.groups.iter()
    }

    /// Indices of the groups the URL is relevant to, in registry order.
    pub fn relevant_indices(&self, url: &str) -> Vec<usize> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.is_relevant(url))
            .map(|(i, _)| i)
            .collect()
    }
}
