use serde::{Deserialize, Serialize};

use crate::config::DisplayValue;
use crate::types::SaveState;

/// A bound control as the page should render it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControlView {
    pub id: String,
    pub region: String,
    /// `None` until the control's section is loaded
    pub display: Option<DisplayValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub controls: Vec<ControlView>,
    pub rejected_controls: Vec<String>,
    pub expanded_regions: Vec<String>,
    pub loaded_sections: Vec<String>,
    pub loading_sections: Vec<String>,
    pub save_state: SaveState,
    /// Busy indicator, set while a save task is in flight
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl ViewModel {
    pub fn control(&self, id: &str) -> Option<&ControlView> {
        self.controls.iter().find(|control| control.id == id)
    }
}
