//! Control identifier <-> configuration path codec
//!
//! A bound control's identifier literally encodes where its value lives:
//! `<section>_<key1>_<key2>...`. Keys that need a literal `_` carry the
//! placeholder `-` instead, which is turned back into `_` on decode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between the segments of a control identifier
pub const ID_SEPARATOR: char = '_';

/// Stands in for a literal `_` inside a key
pub const KEY_PLACEHOLDER: char = '-';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("control id is empty")]
    EmptyId,
    #[error("control id '{0}' contains an empty segment")]
    EmptySegment(String),
}

/// Ordered, non-empty key list; the first key is the section name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConfigPath(Vec<String>);

impl ConfigPath {
    /// Parse a control identifier into a path
    pub fn from_control_id(id: &str) -> Result<Self, PathError> {
        if id.is_empty() {
            return Err(PathError::EmptyId);
        }

        id.split(ID_SEPARATOR)
            .map(|segment| {
                if segment.is_empty() {
                    Err(PathError::EmptySegment(id.to_string()))
                } else {
                    Ok(decode_path_segment(segment))
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Build a path from already decoded keys. Returns `None` for an empty list.
    pub fn from_keys<I, S>(keys: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        (!keys.is_empty()).then_some(Self(keys))
    }

    /// Encode the path back into the control identifier it came from
    pub fn to_control_id(&self) -> String {
        self.0
            .iter()
            .map(|key| encode_path_segment(key))
            .collect::<Vec<_>>()
            .join(&ID_SEPARATOR.to_string())
    }

    pub fn section(&self) -> &str {
        &self.0[0]
    }

    /// Keys below the section
    pub fn keys(&self) -> &[String] {
        &self.0[1..]
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, paths hold at least the section key
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for ConfigPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_control_id(s)
    }
}

impl TryFrom<String> for ConfigPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_control_id(&value)
    }
}

impl From<ConfigPath> for String {
    fn from(path: ConfigPath) -> Self {
        path.to_control_id()
    }
}

/// Turn a camel-case section name into the device's dashed resource name,
/// e.g. `wifiStaConfig` -> `wifi-sta-config`.
pub fn encode_section_name(name: &str) -> String {
    let mut encoded = String::with_capacity(name.len() + 4);

    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                encoded.push('-');
            }
            encoded.extend(c.to_lowercase());
        } else {
            encoded.push(c);
        }
    }

    encoded
}

/// Restore the literal key from an identifier segment
pub fn decode_path_segment(segment: &str) -> String {
    segment.replace(KEY_PLACEHOLDER, &ID_SEPARATOR.to_string())
}

pub fn encode_path_segment(key: &str) -> String {
    key.replace(ID_SEPARATOR, &KEY_PLACEHOLDER.to_string())
}
