//! Deep-merge and `extends` inheritance resolution for YAML rule documents.

use std::collections::{HashMap, HashSet};

/// Maximum inheritance chain depth to prevent infinite loops.
const MAX_EXTENDS_DEPTH: usize = 5;

/// Deep-merge two YAML `Value` maps: child fields win, arrays replace entirely.
///
/// A child overriding `spec.rules` therefore replaces the whole rule table,
/// while a child overriding `spec.tiers.high` keeps the parent's `medium`.
pub fn deep_merge(parent: &serde_yaml::Value, child: &serde_yaml::Value) -> serde_yaml::Value {
    match (parent, child) {
        (serde_yaml::Value::Mapping(pm), serde_yaml::Value::Mapping(cm)) => {
            let mut merged = pm.clone();
            for (key, child_val) in cm {
                let value = match pm.get(key) {
                    Some(parent_val) => deep_merge(parent_val, child_val),
                    None => child_val.clone(),
                };
                merged.insert(key.clone(), value);
            }
            serde_yaml::Value::Mapping(merged)
        }
        (_, child) => child.clone(),
    }
}

/// Resolve a single document's `extends` chain against a pool of raw documents.
pub fn resolve_chain(
    id: &str,
    raw_values: &HashMap<String, serde_yaml::Value>,
) -> std::result::Result<serde_yaml::Value, String> {
    let mut resolved = HashMap::new();
    let mut in_progress = HashSet::new();
    resolve_single(id, raw_values, &mut resolved, &mut in_progress, 0)
}

/// Read `metadata.extends` from a raw document.
fn parent_of(raw: &serde_yaml::Value) -> Option<String> {
    raw.get("metadata")
        .and_then(|meta| meta.get("extends"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn resolve_single(
    id: &str,
    raw_values: &HashMap<String, serde_yaml::Value>,
    resolved: &mut HashMap<String, serde_yaml::Value>,
    in_progress: &mut HashSet<String>,
    depth: usize,
) -> std::result::Result<serde_yaml::Value, String> {
    if let Some(val) = resolved.get(id) {
        return Ok(val.clone());
    }

    if in_progress.contains(id) {
        return Err(format!("circular extends chain detected for rule '{}'", id));
    }

    if depth > MAX_EXTENDS_DEPTH {
        return Err(format!(
            "extends chain exceeds maximum depth ({}) for rule '{}'",
            MAX_EXTENDS_DEPTH, id
        ));
    }

    let raw = raw_values
        .get(id)
        .ok_or_else(|| format!("rule '{}' not found for extends resolution", id))?;

    let result = match parent_of(raw) {
        Some(parent_id) => {
            in_progress.insert(id.to_string());
            let mut parent_val = resolve_single(&parent_id, raw_values, resolved, in_progress, depth + 1)?;
            in_progress.remove(id);
            // A disabled parent still yields enabled children.
            if let Some(meta) = parent_val.get_mut("metadata").and_then(|m| m.as_mapping_mut()) {
                meta.remove("enabled");
            }
            deep_merge(&parent_val, raw)
        }
        None => raw.clone(),
    };

    resolved.insert(id.to_string(), result.clone());
    Ok(result)
}
