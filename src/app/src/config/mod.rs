//! Configuration engine: path codec, tree access, coercion and the store
//! holding every loaded section.

pub mod coercion;
pub mod path;
pub mod schema;
pub mod tree;

pub use coercion::{
    decode_for_display, encode_from_control, ControlState, DisplayValue, SelectOption,
    NO_SELECTION,
};
pub use path::{encode_section_name, ConfigPath, PathError};
pub use schema::{LeafType, SectionSchema};
pub use tree::{AccessError, ConfigTree};

use serde_json::Value;
use std::collections::BTreeMap;

/// Loaded sections keyed by name, kept in load order.
///
/// A section missing here has not been loaded yet; a loaded section may
/// still be an empty mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigStore {
    sections: ConfigTree,
    schemas: BTreeMap<String, SectionSchema>,
}

impl ConfigStore {
    pub fn is_loaded(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Add a section as delivered by the device, resolving its schema
    pub fn insert_section(&mut self, section: &str, document: ConfigTree) {
        let document = Value::Object(document);
        self.schemas.insert(
            section.to_string(),
            SectionSchema::from_document(section, &document),
        );
        self.sections.insert(section.to_string(), document);
    }

    pub fn section(&self, section: &str) -> Option<&Value> {
        self.sections.get(section)
    }

    /// Names of the loaded sections in load order
    pub fn section_names(&self) -> impl Iterator<Item = &String> {
        self.sections.keys()
    }

    pub fn read(&self, path: &ConfigPath) -> Result<&Value, AccessError> {
        tree::read(&self.sections, path)
    }

    /// Store `value` at `path` without coercion
    pub fn write(&mut self, path: &ConfigPath, value: Value) -> Option<Value> {
        tree::write(&mut self.sections, path, value)
    }

    /// Type a leaf is coerced to: the section schema first, then whatever
    /// is currently stored there.
    pub fn leaf_type(&self, path: &ConfigPath) -> Option<LeafType> {
        self.schemas
            .get(path.section())
            .and_then(|schema| schema.leaf_type(path))
            .or_else(|| self.read(path).ok().and_then(LeafType::of))
    }

    /// Coerce a control's state for `path` and store it. Returns the stored value.
    pub fn apply_input(&mut self, path: &ConfigPath, control: &ControlState) -> Value {
        let value = encode_from_control(self.leaf_type(path), control);
        self.write(path, value.clone());
        value
    }
}
