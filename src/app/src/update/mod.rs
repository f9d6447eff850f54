mod binding;
mod loader;
mod save;
mod ui;

use crux_core::Command;

use crate::events::{ConfigEvent, Event};
use crate::model::Model;
use crate::Effect;

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Config(
            event @ (ConfigEvent::RegisterControls { .. } | ConfigEvent::ControlInput { .. }),
        ) => binding::handle(event, model),
        Event::Config(event) => loader::handle(event, model),
        Event::Portal(event) => save::handle(event, model),
        Event::Ui(event) => ui::handle(event, model),
    }
}
