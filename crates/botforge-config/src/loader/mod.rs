//! Bot configuration resolver.
//!
//! Seeds a working document from the bundled defaults, merges a
//! deployment-supplied override (text blob, file, or remote fetch) with
//! alias and global-overlay resolution, and validates the merged result
//! before returning it.

mod alias;
mod fetch;
mod merge;
mod schema;


pub use alias::AliasTable;

use crate::ConfigError;
use crate::model::{ModuleConfig, ResolvedConfig};
use crate::settings::DeploymentSettings;
use log::{error, info, warn};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Defaults document bundled with the crate; trusted and always well-formed.
const DEFAULTS_YML: &str = include_str!("../../data/defaults.yml");

/// Top-level override keys that are reserved rather than module sections.
const RESERVED_KEYS: &[&str] = &["version", "global"];

/// Resolves override documents against the bundled defaults.
///
/// A resolver is cheap to construct and holds no mutable state; every
/// `resolve_*` call produces a fresh document the caller owns outright.
#[derive(Debug, Clone)]
pub struct Resolver {
    defaults: Value,
    aliases: AliasTable,
}

impl Resolver {
    /// Build a resolver from already-loaded deployment settings.
    pub fn new(settings: &DeploymentSettings) -> Result<Self, ConfigError> {
        let aliases = AliasTable::from_settings(settings)?;
        let defaults: Value = serde_yaml::from_str(DEFAULTS_YML)?;
        Ok(Self { defaults, aliases })
    }

    /// Build a resolver from the bundled settings document.
    pub fn bundled(deployment: &str) -> Result<Self, ConfigError> {
        Self::new(&DeploymentSettings::bundled(deployment)?)
    }

    /// The alias table in effect for this resolver.
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Resolve with no override: a validated deep copy of the defaults.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        self.resolve_with(None, None)
    }

    /// Resolve with an override file.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> Result<ResolvedConfig, ConfigError> {
        self.resolve_with(Some(path.as_ref()), None)
    }

    /// Resolve with an in-memory override document.
    pub fn resolve_str(&self, text: &str) -> Result<ResolvedConfig, ConfigError> {
        self.resolve_with(None, Some(text))
    }

    /// Resolve with at most one of an override path or text blob.
    pub fn resolve_with(
        &self,
        path: Option<&Path>,
        text: Option<&str>,
    ) -> Result<ResolvedConfig, ConfigError> {
        if path.is_some() && text.is_some() {
            return Err(ConfigError::Usage(
                "provided both forms of configuration, use only a path or only a text blob"
                    .to_string(),
            ));
        }

        let mut result = self.defaults.clone();

        let text = match (path, text) {
            (Some(path), None) => {
                if !path.is_file() {
                    return Err(ConfigError::Usage(format!(
                        "configuration file not found: {}",
                        path.display()
                    )));
                }
                Some(fs::read_to_string(path)?)
            }
            (None, Some(text)) => Some(text.to_string()),
            _ => None,
        };

        let Some(text) = text.filter(|text| !text.trim().is_empty()) else {
            info!("no config provided, using defaults");
            return Ok(ResolvedConfig::new(result));
        };

        // Hand-edited files sometimes carry tabs at line ends.
        let text = text.replace("\t\n", "\n");
        let override_doc: Value = serde_yaml::from_str(&text)?;
        let Value::Object(mut override_map) = override_doc else {
            return Err(ConfigError::InvalidField {
                path: "override:root".to_string(),
                message: "expected mapping".to_string(),
            });
        };

        self.warn_unknown_keys(&override_map);
        self.distribute_global(&mut result, &override_map);
        // distributed into every module above; must not merge as a literal key
        override_map.remove("global");

        merge::merge_values(&mut result, &Value::Object(override_map), &self.aliases);

        schema::validate_document(&result, &self.aliases, "effective")?;
        Ok(ResolvedConfig::new(result))
    }

    /// Fetch a remote override and project out one module's section.
    ///
    /// The whole document is still resolved and validated; only the
    /// requested module is returned. A non-200 response falls back to the
    /// defaults, transport failures propagate.
    pub fn fetch_module(&self, module_key: &str, url: &str) -> Result<ModuleConfig, ConfigError> {
        if module_key.is_empty() {
            return Err(ConfigError::Usage(
                "no configuration key given".to_string(),
            ));
        }
        let key = self.aliases.resolve(module_key);
        if !self.aliases.is_canonical(key) {
            return Err(ConfigError::Usage(format!(
                "unknown bot configuration key '{module_key}'; supported are: {}",
                self.aliases.supported()
            )));
        }

        let override_text = fetch::fetch_override(url)?.unwrap_or_default();
        let resolved = self.resolve_str(&override_text)?;
        resolved.module(key)?.ok_or_else(|| {
            ConfigError::Invalid(format!(
                "module '{key}' missing from resolved configuration"
            ))
        })
    }

    /// Warn about top-level keys that resolve to nothing we recognize.
    ///
    /// Unknown keys are merged as passthrough regardless; the warning is
    /// the only consequence.
    fn warn_unknown_keys(&self, override_map: &Map<String, Value>) {
        for key in override_map.keys() {
            let resolved = self.aliases.resolve(key);
            if !self.aliases.is_canonical(resolved) && !RESERVED_KEYS.contains(&resolved) {
                warn!(
                    "unsupported key '{key}'; supported are: {}",
                    self.aliases.supported()
                );
            }
        }
    }

    /// Merge the override's `global` section into every canonical module.
    ///
    /// A malformed (non-mapping) `global` is logged per module and skipped;
    /// resolution of the rest of the document continues.
    fn distribute_global(&self, result: &mut Value, override_map: &Map<String, Value>) {
        let Some(global) = override_map.get("global") else {
            return;
        };
        let Value::Object(result_map) = result else {
            return;
        };
        for key in self.aliases.canonical_keys() {
            let section = result_map
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Err(err) = merge::merge_section(section, global, &self.aliases) {
                error!("skipping 'global' for module '{key}': {err}");
            }
        }
    }
}
