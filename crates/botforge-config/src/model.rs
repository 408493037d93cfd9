//! Typed views over resolved bot configuration.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A fully merged, schema-validated configuration document.
///
/// The document keeps its dynamic shape (module sections are an open set
/// per deployment); typed access goes through [`ResolvedConfig::module`].
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    doc: Value,
}

impl ResolvedConfig {
    pub(crate) fn new(doc: Value) -> Self {
        Self { doc }
    }

    /// The free-form `version` marker, when present.
    pub fn version(&self) -> Option<&str> {
        self.doc.get("version")?.as_str()
    }

    /// Raw access to a top-level section.
    pub fn section(&self, key: &str) -> Option<&Value> {
        self.doc.get(key)
    }

    /// Decode one module's section into its typed form.
    pub fn module(&self, key: &str) -> Result<Option<ModuleConfig>, ConfigError> {
        match self.section(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// The whole document as a JSON value.
    pub fn as_value(&self) -> &Value {
        &self.doc
    }

    /// Consume the wrapper and return the document.
    pub fn into_value(self) -> Value {
        self.doc
    }
}

/// One module's section of the resolved document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModuleConfig {
    /// Whether the bot acts on this repository at all.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Where the bot reports its results.
    #[serde(default)]
    pub notifications: Option<NotificationsConfig>,
    /// Module-specific fields, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModuleConfig {
    /// Whether the module is enabled; an absent flag means disabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }
}

/// Notification targets for a module.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotificationsConfig {
    pub email_addresses: Vec<String>,
    #[serde(default)]
    pub irc: Vec<String>,
}
