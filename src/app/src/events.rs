use serde::{Deserialize, Serialize};

use crate::config::{ConfigTree, ControlState};
use crate::types::ControlDescriptor;

/// Binding, loading and editing of configuration values
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum ConfigEvent {
    /// Announce every configuration-bound control of the page
    RegisterControls { controls: Vec<ControlDescriptor> },
    /// A bound control was edited
    ControlInput { id: String, state: ControlState },
    /// A collapsible region was expanded or collapsed
    RegionToggled { region: String, expanded: bool },

    #[serde(skip)]
    SectionLoaded {
        section: String,
        result: Result<ConfigTree, String>,
    },
}

/// Persisting the configuration to the device
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum PortalEvent {
    Save,

    #[serde(skip)]
    SaveTaskSettled(Result<(), String>),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ClearError,
    ClearSuccess,
    /// Failure the shell could not handle itself; shown as the alert
    UnhandledError { message: String },
}

/// Events that can happen in the app
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Event {
    Config(ConfigEvent),
    Portal(PortalEvent),
    Ui(UiEvent),
}
