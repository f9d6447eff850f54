use std::collections::{BTreeMap, BTreeSet};

use crate::config::{ConfigStore, DisplayValue};
use crate::types::{BindingTable, ControlView, SavePipeline, ViewModel};

/// Application Model - the complete state
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Model {
    // Configuration state
    pub store: ConfigStore,
    pub bindings: BindingTable,
    /// Display form per control id, for controls whose value is known
    pub displays: BTreeMap<String, DisplayValue>,
    pub rejected_controls: Vec<String>,

    // Lazy loading state
    pub expanded_regions: BTreeSet<String>,
    pub loading_sections: BTreeSet<String>,

    // Save/restart state
    pub save_pipeline: SavePipeline,

    // UI state
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl Model {
    /// Set the busy indicator. Alerts raised meanwhile by section loads stay visible.
    pub fn start_loading(&mut self) {
        self.is_loading = true;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
    }

    /// Set an error message and stop loading
    pub fn set_error(&mut self, error: String) {
        self.is_loading = false;
        self.error_message = Some(error);
    }

    /// Set an error message, stop loading, and return a render command
    pub fn set_error_and_render(
        &mut self,
        error: String,
    ) -> crux_core::Command<crate::Effect, crate::events::Event> {
        self.set_error(error);
        crux_core::render::render()
    }

    pub fn view(&self) -> ViewModel {
        ViewModel {
            controls: self
                .bindings
                .iter()
                .map(|binding| ControlView {
                    id: binding.control_id.clone(),
                    region: binding.region.clone(),
                    display: self.displays.get(&binding.control_id).cloned(),
                })
                .collect(),
            rejected_controls: self.rejected_controls.clone(),
            expanded_regions: self.expanded_regions.iter().cloned().collect(),
            loaded_sections: self.store.section_names().cloned().collect(),
            loading_sections: self.loading_sections.iter().cloned().collect(),
            save_state: self.save_pipeline.state().clone(),
            is_loading: self.is_loading,
            error_message: self.error_message.clone(),
            success_message: self.success_message.clone(),
        }
    }
}
