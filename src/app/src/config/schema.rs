use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::path::ConfigPath;

/// Storage type of a configuration leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeafType {
    Number,
    Boolean,
    String,
    List,
}

impl LeafType {
    /// Runtime type of a stored value; `None` for null and mappings
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Number(_) => Some(Self::Number),
            Value::Bool(_) => Some(Self::Boolean),
            Value::String(_) => Some(Self::String),
            Value::Array(_) => Some(Self::List),
            Value::Null | Value::Object(_) => None,
        }
    }
}

/// Leaf types of one section, resolved once when the section is loaded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionSchema {
    leaves: BTreeMap<ConfigPath, LeafType>,
}

impl SectionSchema {
    /// Derive the schema from a section document as delivered by the device
    pub fn from_document(section: &str, document: &Value) -> Self {
        let mut leaves = BTreeMap::new();
        let mut pending = vec![(vec![section.to_string()], document)];

        while let Some((keys, value)) = pending.pop() {
            match value {
                Value::Object(mapping) => {
                    for (key, child) in mapping {
                        let mut child_keys = keys.clone();
                        child_keys.push(key.clone());
                        pending.push((child_keys, child));
                    }
                }
                leaf => {
                    if let (Some(leaf_type), Some(path)) =
                        (LeafType::of(leaf), ConfigPath::from_keys(keys))
                    {
                        leaves.insert(path, leaf_type);
                    }
                }
            }
        }

        Self { leaves }
    }

    pub fn leaf_type(&self, path: &ConfigPath) -> Option<LeafType> {
        self.leaves.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_records_every_typed_leaf() {
        let document = json!({
            "hostname": "node",
            "config": { "ssid": "home", "channel": 6, "hidden": false },
            "countries": ["NL"],
            "gateway": null,
        });

        let schema = SectionSchema::from_document("wifiSta", &document);
        let path = |id: &str| ConfigPath::from_control_id(id).unwrap();

        assert_eq!(schema.len(), 5);
        assert_eq!(schema.leaf_type(&path("wifiSta_hostname")), Some(LeafType::String));
        assert_eq!(schema.leaf_type(&path("wifiSta_config_channel")), Some(LeafType::Number));
        assert_eq!(schema.leaf_type(&path("wifiSta_config_hidden")), Some(LeafType::Boolean));
        assert_eq!(schema.leaf_type(&path("wifiSta_countries")), Some(LeafType::List));
        assert_eq!(schema.leaf_type(&path("wifiSta_gateway")), None);
        assert_eq!(schema.leaf_type(&path("wifiSta_config")), None);
    }

    #[test]
    fn empty_section_has_empty_schema() {
        assert!(SectionSchema::from_document("wifi", &json!({})).is_empty());
    }
}
