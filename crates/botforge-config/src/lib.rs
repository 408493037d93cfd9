//! Configuration models and bot-config resolution.
//!
//! This crate owns the Botforge defaults document, legacy key aliasing,
//! the recursive override merge, and schema validation of the merged
//! result, used by every bot built on the framework.

mod error;
mod loader;
mod model;
mod settings;

/// Public error type returned by config resolution APIs.
pub use error::ConfigError;
/// Resolver and alias table.
pub use loader::{AliasTable, Resolver};
/// Typed views over resolved configuration.
pub use model::{ModuleConfig, NotificationsConfig, ResolvedConfig};
/// Deployment settings and their explicit cache.
pub use settings::{DEPLOYMENT_ENV, DeploymentSettings, SettingsCache, deployment_from_env};
