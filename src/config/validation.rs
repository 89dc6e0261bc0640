//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every regex entry compiles
//! - Reject unnamed groups
//! - Report, but accept, duplicate and reserved group names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ObserverConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::{ObserverConfig, RouteRule};
use crate::routing::group::DEFAULT_GROUP_NAME;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("routing group #{index} has an empty name")]
    EmptyGroupName { index: usize },

    #[error("invalid route pattern {pattern:?} in {scope}: {reason}")]
    InvalidPattern {
        scope: String,
        pattern: String,
        reason: String,
    },
}

fn check_rules(scope: &str, rules: Option<&[RouteRule]>, errors: &mut Vec<ValidationError>) {
    for rule in rules.unwrap_or_default() {
        if let RouteRule::Pattern { regex } = rule {
            if let Err(e) = regex::Regex::new(regex) {
                errors.push(ValidationError::InvalidPattern {
                    scope: scope.to_string(),
                    pattern: regex.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

/// Validate a configuration.
///
/// Duplicate group names and an explicit `default` group are logged and accepted:
/// each such group tracks navigations independently.
pub fn validate_config(config: &ObserverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_rules("global whitelisted_routes", config.whitelisted_routes.as_deref(), &mut errors);
    check_rules("global blacklisted_routes", config.blacklisted_routes.as_deref(), &mut errors);

    let mut seen = HashSet::new();
    for (index, group) in config.routing_groups.iter().enumerate() {
        if group.name.trim().is_empty() {
            errors.push(ValidationError::EmptyGroupName { index });
        } else if group.name == DEFAULT_GROUP_NAME {
            tracing::warn!(
                group = %group.name,
                "Group uses the reserved name; it is tracked alongside the implicit default group"
            );
        } else if !seen.insert(group.name.as_str()) {
            tracing::warn!(group = %group.name, "Duplicate routing group name");
        }

        let scope = format!("group {:?}", group.name);
        check_rules(&format!("{scope} whitelisted_routes"), group.whitelisted_routes.as_deref(), &mut errors);
        check_rules(&format!("{scope} blacklisted_routes"), group.blacklisted_routes.as_deref(), &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
