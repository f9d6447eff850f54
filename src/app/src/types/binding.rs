use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::{ConfigPath, PathError};

/// Control whose edits also seed the access-point network name
pub const HOSTNAME_CONTROL_ID: &str = "wifiSta_hostname";
pub const AP_SSID_CONTROL_ID: &str = "wifiAp_config_ssid";
pub const AP_SSID_SUFFIX: &str = "_ap";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlKind {
    #[default]
    Input,
    MultiSelect {
        options: Vec<String>,
    },
}

impl ControlKind {
    pub fn options(&self) -> &[String] {
        match self {
            ControlKind::Input => &[],
            ControlKind::MultiSelect { options } => options,
        }
    }
}

/// A configuration-bound control as announced by the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ControlDescriptor {
    #[validate(min_length = 1)]
    pub id: String,
    /// Collapsible region the control lives in
    #[validate(min_length = 1)]
    pub region: String,
    #[serde(default)]
    pub kind: ControlKind,
}

impl ControlDescriptor {
    pub fn input(id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            region: region.into(),
            kind: ControlKind::Input,
        }
    }

    pub fn multi_select<S: Into<String>>(
        id: impl Into<String>,
        region: impl Into<String>,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            id: id.into(),
            region: region.into(),
            kind: ControlKind::MultiSelect {
                options: options.into_iter().map(Into::into).collect(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("control '{id}' is invalid: {reason}")]
    Invalid { id: String, reason: String },
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("control '{0}' is already bound")]
    Duplicate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub control_id: String,
    pub region: String,
    pub path: ConfigPath,
    pub kind: ControlKind,
}

/// Editing `source` also writes `<value><suffix>` into `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedDefault {
    pub source: ConfigPath,
    pub target: ConfigPath,
    pub suffix: String,
}

impl DerivedDefault {
    pub fn access_point_name() -> Option<Self> {
        Some(Self {
            source: ConfigPath::from_control_id(HOSTNAME_CONTROL_ID).ok()?,
            target: ConfigPath::from_control_id(AP_SSID_CONTROL_ID).ok()?,
            suffix: AP_SSID_SUFFIX.to_string(),
        })
    }
}

/// Control id -> path table, built once when the page registers its controls.
/// Bindings are kept in registration order, which is the order of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingTable {
    bindings: Vec<Binding>,
    index: BTreeMap<String, usize>,
    derived: Vec<DerivedDefault>,
}

impl Default for BindingTable {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
            index: BTreeMap::new(),
            derived: DerivedDefault::access_point_name().into_iter().collect(),
        }
    }
}

impl BindingTable {
    pub fn register(&mut self, descriptor: ControlDescriptor) -> Result<(), BindingError> {
        descriptor.validate().map_err(|e| BindingError::Invalid {
            id: descriptor.id.clone(),
            reason: e.to_string(),
        })?;

        let path = ConfigPath::from_control_id(&descriptor.id)?;

        if path.len() < 2 {
            return Err(BindingError::Invalid {
                id: descriptor.id,
                reason: "id names a section but no field".to_string(),
            });
        }

        if self.index.contains_key(&descriptor.id) {
            return Err(BindingError::Duplicate(descriptor.id));
        }

        self.index.insert(descriptor.id.clone(), self.bindings.len());
        self.bindings.push(Binding {
            control_id: descriptor.id,
            region: descriptor.region,
            path,
            kind: descriptor.kind,
        });

        Ok(())
    }

    pub fn get(&self, control_id: &str) -> Option<&Binding> {
        self.index.get(control_id).and_then(|&i| self.bindings.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Distinct sections referenced by the controls of `region`
    pub fn sections_in_region(&self, region: &str) -> BTreeSet<String> {
        self.iter()
            .filter(|binding| binding.region == region)
            .map(|binding| binding.path.section().to_string())
            .collect()
    }

    pub fn bound_to_section<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a Binding> {
        self.iter()
            .filter(move |binding| binding.path.section() == section)
    }

    pub fn bound_to_path<'a>(&'a self, path: &'a ConfigPath) -> impl Iterator<Item = &'a Binding> {
        self.iter().filter(move |binding| &binding.path == path)
    }

    pub fn derived_from<'a>(
        &'a self,
        path: &'a ConfigPath,
    ) -> impl Iterator<Item = &'a DerivedDefault> {
        self.derived.iter().filter(move |rule| &rule.source == path)
    }
}
