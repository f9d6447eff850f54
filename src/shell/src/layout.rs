//! Controls the shell registers with the core, in page order.
//!
//! A layout file is a JSON array of control descriptors:
//!
//! ```json
//! [
//!   { "id": "wifiSta_config_ssid", "region": "station" },
//!   { "id": "wifi_country_list", "region": "station",
//!     "kind": { "multiSelect": { "options": ["NL", "DE", "--"] } } }
//! ]
//! ```

use anyhow::{ensure, Context, Result};
use serde_valid::Validate;
use std::path::Path;
use wifi_portal_core::{ControlDescriptor, ControlKind, ControlState};

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    controls: Vec<ControlDescriptor>,
}

impl Default for Layout {
    /// The setup page as shipped with the device
    fn default() -> Self {
        Self {
            controls: vec![
                ControlDescriptor::input("wifiSta_config_ssid", "station"),
                ControlDescriptor::input("wifiSta_config_pwd", "station"),
                ControlDescriptor::input("wifiSta_hostname", "station"),
                ControlDescriptor::input("wifi_country_country", "country"),
                ControlDescriptor::input("wifiAp_config_ssid", "accessPoint"),
                ControlDescriptor::input("wifiAp_config_pwd", "accessPoint"),
                ControlDescriptor::input("webPortal_usr", "admin"),
                ControlDescriptor::input("webPortal_pwd", "admin"),
            ],
        }
    }
}

impl Layout {
    pub fn new(controls: Vec<ControlDescriptor>) -> Self {
        Self { controls }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("failed to read layout file {}", path.display()))?;
        let controls: Vec<ControlDescriptor> = serde_json::from_str(&content)
            .context(format!("failed to parse layout file {}", path.display()))?;

        for control in &controls {
            control
                .validate()
                .context(format!("invalid control in layout file {}", path.display()))?;
        }
        ensure!(
            !controls.is_empty(),
            "layout file {} has no controls",
            path.display()
        );

        Ok(Self { controls })
    }

    pub fn controls(&self) -> &[ControlDescriptor] {
        &self.controls
    }

    /// Regions in order of first appearance
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = Vec::new();
        for control in &self.controls {
            if !regions.contains(&control.region) {
                regions.push(control.region.clone());
            }
        }
        regions
    }

    pub fn find(&self, id: &str) -> Option<&ControlDescriptor> {
        self.controls.iter().find(|control| control.id == id)
    }

    /// The state a control reports for `value` as typed on the command line.
    /// Multi-select values are comma-separated option values.
    pub fn control_state(&self, id: &str, value: &str) -> Result<ControlState> {
        let control = self
            .find(id)
            .context(format!("control '{id}' is not part of the layout"))?;

        match &control.kind {
            ControlKind::Input => Ok(ControlState::text(value)),
            ControlKind::MultiSelect { options } => {
                let selected: Vec<&str> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .collect();

                if let Some(unknown) = selected.iter().find(|v| !options.iter().any(|o| o == *v)) {
                    anyhow::bail!("'{unknown}' is not an option of control '{id}'");
                }

                let options: Vec<&str> = options.iter().map(String::as_str).collect();
                Ok(ControlState::multi_select(&options, &selected))
            }
        }
    }
}
