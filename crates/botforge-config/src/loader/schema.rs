//! Schema validation for merged bot configuration documents.
//!
//! The walk is structural: known fields are type-checked, unknown keys are
//! left alone. Unknown top-level sections were already warned about by the
//! resolver and pass through untouched.

use super::alias::AliasTable;
use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a fully merged configuration document.
pub(super) fn validate_document(
    value: &Value,
    aliases: &AliasTable,
    layer: &str,
) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;

    if let Some(value) = map.get("version") {
        expect_string(value, layer, "version")?;
    }
    if let Some(value) = map.get("global") {
        validate_common(value, layer, "global")?;
    }
    for module in aliases.canonical_keys() {
        if let Some(value) = map.get(module) {
            validate_module(module, value, layer, module)?;
        }
    }
    Ok(())
}

/// Validate one module section: the common shape plus module extensions.
fn validate_module(
    module: &str,
    value: &Value,
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    let map = validate_common(value, layer, path)?;

    if module == "upstream-to-downstream" {
        for key in ["master_checker", "pr_checker"] {
            if let Some(value) = map.get(key) {
                expect_bool(value, layer, &join_path(path, key))?;
            }
        }
        for key in [
            "upstream_branch_name",
            "upstream_git_path",
            "pr_comment_message",
            "jira_ticket",
            "image_url",
        ] {
            if let Some(value) = map.get(key) {
                expect_string(value, layer, &join_path(path, key))?;
            }
        }
    }
    Ok(())
}

/// Validate the shape shared by `global` and every module section.
fn validate_common<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    let map = expect_object(value, layer, path)?;

    if let Some(value) = map.get("enabled") {
        expect_bool(value, layer, &join_path(path, "enabled"))?;
    }
    if let Some(value) = map.get("notifications") {
        validate_notifications(value, layer, &join_path(path, "notifications"))?;
    }
    Ok(map)
}

/// Validate a notifications block.
fn validate_notifications(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;

    let addresses_path = join_path(path, "email_addresses");
    let Some(addresses) = map.get("email_addresses") else {
        return Err(invalid_field(layer, &addresses_path, "missing required field"));
    };
    let arr = expect_array(addresses, layer, &addresses_path)?;
    if arr.is_empty() {
        return Err(invalid_field(layer, &addresses_path, "expected at least one address"));
    }
    for (idx, entry) in arr.iter().enumerate() {
        let entry_path = format!("{addresses_path}[{idx}]");
        let Some(address) = entry.as_str() else {
            return Err(invalid_field(layer, &entry_path, "expected string"));
        };
        if !address.contains('@') {
            return Err(invalid_field(layer, &entry_path, "expected email address"));
        }
    }

    if let Some(value) = map.get("irc") {
        validate_string_array(value, layer, &join_path(path, "irc"))?;
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON array or return a typed error.
fn expect_array<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Vec<Value>, ConfigError> {
    match value {
        Value::Array(arr) => Ok(arr),
        _ => Err(invalid_field(layer, path, "expected array")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a JSON boolean or return a typed error.
fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if matches!(value, Value::Bool(_)) {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected bool"))
    }
}

/// Validate that a value is an array of strings.
fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let arr = expect_array(value, layer, path)?;
    for (idx, entry) in arr.iter().enumerate() {
        if entry.as_str().is_none() {
            return Err(invalid_field(
                layer,
                &format!("{path}[{idx}]"),
                "expected string",
            ));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
