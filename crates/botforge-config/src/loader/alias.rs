//! Legacy key aliasing for bot configuration sections.

use crate::ConfigError;
use crate::settings::DeploymentSettings;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Maps legacy module names to canonical ones.
///
/// The table is flat: every value is canonical, so resolution is a single
/// lookup and resolving an already-canonical key is the identity.
#[derive(Debug, Clone)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
    canonical: BTreeSet<String>,
}

impl AliasTable {
    /// Build the table from the `config:bot-conf-keys-aliases` settings entry.
    pub fn from_settings(settings: &DeploymentSettings) -> Result<Self, ConfigError> {
        let value = settings.require("config", "bot-conf-keys-aliases")?;
        let Value::Object(map) = value else {
            return Err(ConfigError::Invalid(
                "config:bot-conf-keys-aliases must be a mapping".to_string(),
            ));
        };

        let mut aliases = BTreeMap::new();
        let mut canonical = BTreeSet::new();
        for (alias, target) in map {
            let Some(target) = target.as_str() else {
                return Err(ConfigError::Invalid(format!(
                    "alias '{alias}' must map to a module name"
                )));
            };
            aliases.insert(alias.clone(), target.to_string());
            canonical.insert(target.to_string());
        }
        Ok(Self { aliases, canonical })
    }

    /// Resolve a key to its canonical form; unknown keys pass through.
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        self.aliases.get(key).map_or(key, String::as_str)
    }

    /// Whether the key (already resolved) names a recognized module.
    pub fn is_canonical(&self, key: &str) -> bool {
        self.canonical.contains(key)
    }

    /// The full set of canonical module keys.
    pub fn canonical_keys(&self) -> impl Iterator<Item = &str> {
        self.canonical.iter().map(String::as_str)
    }

    /// Render the canonical set for error and warning messages.
    pub fn supported(&self) -> String {
        self.canonical
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
