//! Recursive merge of override documents into a base document.

use super::alias::AliasTable;
use crate::ConfigError;
use serde_json::Value;

/// Merge `from` into `into`, recursing where both sides are mappings.
///
/// Keys are alias-resolved at every depth, so legacy names are folded into
/// their canonical sections wherever they appear. Values that are not merged
/// structurally are overwritten with a deep copy; the source document is
/// never aliased by the result.
pub(super) fn merge_values(into: &mut Value, from: &Value, aliases: &AliasTable) {
    let (Value::Object(into_map), Value::Object(from_map)) = (into, from) else {
        return;
    };
    for (key, value) in from_map {
        let key = aliases.resolve(key);
        let structural = value.is_object() && into_map.get(key).is_some_and(Value::is_object);
        if structural {
            if let Some(existing) = into_map.get_mut(key) {
                merge_values(existing, value, aliases);
            }
        } else {
            into_map.insert(key.to_string(), value.clone());
        }
    }
}

/// Merge an overlay into a single module section, requiring mappings.
///
/// Used to distribute the `global` overlay; a non-mapping on either side is
/// reported so the caller can skip the section and keep going.
pub(super) fn merge_section(
    section: &mut Value,
    overlay: &Value,
    aliases: &AliasTable,
) -> Result<(), ConfigError> {
    if !section.is_object() {
        return Err(ConfigError::Invalid(
            "module section is not a mapping".to_string(),
        ));
    }
    if !overlay.is_object() {
        return Err(ConfigError::Invalid(format!(
            "wrong 'global' value: {overlay}"
        )));
    }
    merge_values(section, overlay, aliases);
    Ok(())
}
