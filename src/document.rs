use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::Result;

/// Load a YAML document. A missing file is `Ok(None)`; an empty file is `Value::Null`.
pub fn load(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Some(Value::Null));
    }
    Ok(Some(serde_yaml::from_str(&content)?))
}

/// Write a document back in mapping insertion order. YAML comments are not kept.
pub fn save(path: &Path, doc: &Value) -> Result<()> {
    let content = serde_yaml::to_string(doc)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Walk `path` through nested mappings.
pub fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| node.as_mapping()?.get(*key))
}

/// Clone the mapping at `value`, or an empty one if missing, null or not a mapping.
pub fn mapping_or_empty(value: Option<&Value>) -> Mapping {
    match value {
        Some(Value::Mapping(m)) => m.clone(),
        _ => Mapping::new(),
    }
}

pub fn is_true(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

pub fn is_bool(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(_)))
}

/// True when `value` is a string equal to one of `allowed`.
pub fn str_in(value: Option<&Value>, allowed: &[&str]) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| allowed.contains(&s))
}
