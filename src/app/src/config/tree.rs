//! Path based access into the configuration tree
//!
//! The root is the store's mapping of section name to section tree, so the
//! first path key always selects a section.

use log::warn;
use serde_json::{Map, Value};

use super::path::ConfigPath;

pub type ConfigTree = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// The section has not been loaded yet
    #[error("section '{0}' is not loaded")]
    MissingSection(String),
    /// The section is loaded but lacks a key along the path
    #[error("'{path}' has no field '{key}'")]
    MissingField { path: String, key: String },
}

/// Walk `path` and return the value it addresses
pub fn read<'a>(root: &'a ConfigTree, path: &ConfigPath) -> Result<&'a Value, AccessError> {
    let section = path.section();
    let mut current = root
        .get(section)
        .ok_or_else(|| AccessError::MissingSection(section.to_string()))?;

    for key in path.keys() {
        current = current
            .as_object()
            .and_then(|mapping| mapping.get(key))
            .ok_or_else(|| AccessError::MissingField {
                path: path.to_string(),
                key: key.clone(),
            })?;
    }

    Ok(current)
}

/// Store `value` at `path`, creating missing intermediate mappings on the way.
///
/// Never fails: an intermediate key that is absent, or that holds something
/// other than a mapping, is replaced by an empty mapping. Returns the value
/// previously stored at the leaf, if any.
pub fn write(root: &mut ConfigTree, path: &ConfigPath, value: Value) -> Option<Value> {
    let (leaf, intermediate) = path.segments().split_last()?;

    let mut current = root;
    for key in intermediate {
        let slot = current.entry(key.clone()).or_insert_with(|| {
            warn!("'{path}': creating missing field '{key}'");
            Value::Object(Map::new())
        });
        current = ensure_mapping(slot, path, key);
    }

    current.insert(leaf.clone(), value)
}

fn ensure_mapping<'a>(slot: &'a mut Value, path: &ConfigPath, key: &str) -> &'a mut ConfigTree {
    if !slot.is_object() {
        warn!("'{path}': replacing non-mapping field '{key}' ({slot}) with a mapping");
        *slot = Value::Object(Map::new());
    }

    match slot {
        Value::Object(mapping) => mapping,
        _ => unreachable!("slot was just turned into a mapping"),
    }
}
