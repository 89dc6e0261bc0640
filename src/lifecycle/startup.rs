//! Startup sequencing.

use std::path::Path;

use crate::config::{load_config, ConfigError, ObserverConfig};
use crate::routing::GroupRegistry;

/// Load the configuration file, or defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<ObserverConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(ObserverConfig::default()),
    }
}

/// Build the group registry once, before any navigation is observed.
pub fn build_registry(config: &ObserverConfig) -> Result<GroupRegistry, ConfigError> {
    let registry = GroupRegistry::from_config(config)?;

    tracing::info!(
        groups = registry.len(),
        names = ?registry.iter().map(|g| g.name()).collect::<Vec<_>>(),
        "Routing groups ready"
    );
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = load(None).unwrap();
        assert!(config.routing_groups.is_empty());

        let registry = build_registry(&config).unwrap();
        assert_eq!(registry.len(), 1);
    }
}
