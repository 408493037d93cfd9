//! Deployment settings document and its explicit cache.
//!
//! A settings document is a YAML mapping of sections. A section whose value
//! is a list holds one entry per deployment; the entry whose `deployment`
//! field matches the active deployment name is selected and the field is
//! stripped. The alias table consumed by the resolver lives in the
//! `config` section under `bot-conf-keys-aliases`.

use crate::ConfigError;
use log::{debug, info};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings document bundled with the crate.
const BUNDLED_SETTINGS: &str = include_str!("../data/settings.yml");
/// Settings filename inside a settings directory.
const SETTINGS_FILE: &str = "settings.yml";
/// Environment variable naming the active deployment.
pub const DEPLOYMENT_ENV: &str = "DEPLOYMENT";

/// Read the active deployment name from the environment.
pub fn deployment_from_env() -> Result<String, ConfigError> {
    std::env::var(DEPLOYMENT_ENV).map_err(|_| {
        ConfigError::Usage(format!(
            "{DEPLOYMENT_ENV} environment variable is not set"
        ))
    })
}

/// Settings resolved for a single deployment.
#[derive(Debug, Clone)]
pub struct DeploymentSettings {
    deployment: String,
    doc: Value,
}

impl DeploymentSettings {
    /// Resolve the bundled settings document for the given deployment.
    pub fn bundled(deployment: &str) -> Result<Self, ConfigError> {
        debug!("loading bundled deployment settings (deployment={deployment})");
        Self::from_contents(BUNDLED_SETTINGS, deployment)
    }

    /// Resolve `settings.yml` from a settings directory.
    pub fn from_dir(dir: impl AsRef<Path>, deployment: &str) -> Result<Self, ConfigError> {
        let path = dir.as_ref().join(SETTINGS_FILE);
        info!("loading deployment settings: {}", path.display());
        let contents = fs::read_to_string(&path)?;
        Self::from_contents(&contents, deployment)
    }

    fn from_contents(contents: &str, deployment: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_yaml::from_str(contents)?;
        let Value::Object(map) = value else {
            return Err(ConfigError::Invalid(
                "settings document must be a mapping".to_string(),
            ));
        };
        let doc = select_deployment_entries(map, deployment)?;
        Ok(Self {
            deployment: deployment.to_string(),
            doc: Value::Object(doc),
        })
    }

    /// The deployment this settings view was resolved for.
    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    /// Look up a key inside a settings section, if both exist.
    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.doc.get(section)?.get(key)
    }

    /// Look up a key inside a settings section, failing when absent.
    pub fn require(&self, section: &str, key: &str) -> Result<&Value, ConfigError> {
        self.get(section, key).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "{section}:{key} not set in deployment settings"
            ))
        })
    }
}

/// Replace list-valued sections with the entry matching the deployment.
fn select_deployment_entries(
    mut map: Map<String, Value>,
    deployment: &str,
) -> Result<Map<String, Value>, ConfigError> {
    for (section, value) in &mut map {
        let Value::Array(entries) = value else {
            continue;
        };
        let mut selected = None;
        for entry in entries.iter() {
            let Value::Object(entry_map) = entry else {
                return Err(ConfigError::Invalid(format!(
                    "settings section '{section}' entries must be mappings"
                )));
            };
            let Some(target) = entry_map.get("deployment") else {
                return Err(ConfigError::Invalid(format!(
                    "no 'deployment' in settings section '{section}' entry"
                )));
            };
            if deployment_matches(target, deployment) {
                let mut entry_map = entry_map.clone();
                entry_map.remove("deployment");
                selected = Some(Value::Object(entry_map));
                break;
            }
        }
        if let Some(selected) = selected {
            *value = selected;
        }
    }
    Ok(map)
}

/// A `deployment` field is either a name or a list of names.
fn deployment_matches(target: &Value, deployment: &str) -> bool {
    match target {
        Value::String(name) => name == deployment,
        Value::Array(names) => names
            .iter()
            .any(|name| name.as_str() == Some(deployment)),
        _ => false,
    }
}

/// Explicit cache of settings documents, keyed by settings directory.
///
/// Cached settings are read-only; callers that need to mutate must clone.
#[derive(Debug)]
pub struct SettingsCache {
    deployment: String,
    entries: HashMap<PathBuf, DeploymentSettings>,
}

impl SettingsCache {
    /// Create an empty cache for the given deployment.
    pub fn new(deployment: &str) -> Self {
        Self {
            deployment: deployment.to_string(),
            entries: HashMap::new(),
        }
    }

    /// Load settings from a directory, reusing a previously loaded copy.
    pub fn load(&mut self, dir: impl AsRef<Path>) -> Result<&DeploymentSettings, ConfigError> {
        match self.entries.entry(dir.as_ref().to_path_buf()) {
            Entry::Occupied(entry) => {
                debug!("settings cache hit: {}", entry.key().display());
                Ok(entry.into_mut())
            }
            Entry::Vacant(slot) => {
                let settings = DeploymentSettings::from_dir(slot.key(), &self.deployment)?;
                Ok(slot.insert(settings))
            }
        }
    }

    /// Drop the cached settings for a directory, if present.
    pub fn invalidate(&mut self, dir: impl AsRef<Path>) -> bool {
        self.entries.remove(dir.as_ref()).is_some()
    }

    /// Re-read settings from disk, replacing any cached copy.
    pub fn reload(&mut self, dir: impl AsRef<Path>) -> Result<&DeploymentSettings, ConfigError> {
        self.invalidate(dir.as_ref());
        self.load(dir.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write_settings(dir: &Path, contents: &str) {
        fs::write(dir.join(SETTINGS_FILE), contents).expect("write settings");
    }

    #[test]
    fn bundled_settings_carry_alias_table() {
        let settings = DeploymentSettings::bundled("prod").expect("settings");
        let aliases = settings
            .require("config", "bot-conf-keys-aliases")
            .expect("aliases");
        assert_eq!(aliases["zdravomil"], json!("dockerfile-linter"));
    }

    #[test]
    fn selects_entry_matching_deployment() {
        let temp = TempDir::new().expect("tmp");
        let yaml = "pagure:\n  \
                    - deployment: [prod, stage]\n    \
                    url: https://src.example.org\n  \
                    - deployment: dev\n    \
                    url: https://src.dev.example.org\n";
        write_settings(temp.path(), yaml);
        let settings = DeploymentSettings::from_dir(temp.path(), "dev").expect("settings");
        assert_eq!(
            settings.require("pagure", "url").expect("url"),
            &json!("https://src.dev.example.org")
        );
        // the selector key is stripped from the chosen entry
        assert_eq!(settings.get("pagure", "deployment"), None);
    }

    #[test]
    fn entry_without_deployment_field_is_an_error() {
        let temp = TempDir::new().expect("tmp");
        write_settings(temp.path(), "pagure:\n- url: https://src.example.org\n");
        let err = DeploymentSettings::from_dir(temp.path(), "prod").unwrap_err();
        assert!(format!("{err}").contains("no 'deployment'"));
    }

    #[test]
    fn cache_reuses_until_reloaded() {
        let temp = TempDir::new().expect("tmp");
        write_settings(temp.path(), "pagure:\n  url: one\n");

        let mut cache = SettingsCache::new("prod");
        let first = cache.load(temp.path()).expect("load").clone();
        assert_eq!(first.require("pagure", "url").expect("url"), &json!("one"));

        // a later edit is invisible until the cache entry is reloaded
        write_settings(temp.path(), "pagure:\n  url: two\n");
        let cached = cache.load(temp.path()).expect("load").clone();
        assert_eq!(cached.require("pagure", "url").expect("url"), &json!("one"));

        let reloaded = cache.reload(temp.path()).expect("reload").clone();
        assert_eq!(reloaded.require("pagure", "url").expect("url"), &json!("two"));

        assert!(cache.invalidate(temp.path()));
        assert!(!cache.invalidate(temp.path()));
    }
}
