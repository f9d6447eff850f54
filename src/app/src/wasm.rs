//! Browser bindings of the portal core
//!
//! The setup page loads this module and drives the core through three
//! calls: events in, effect responses in, view model out. All payloads are
//! bincode-serialized by the generated shared types.

use lazy_static::lazy_static;
use wasm_bindgen::prelude::wasm_bindgen;

use crux_core::{bridge::Bridge, Core};

use crate::App;

lazy_static! {
    static ref PORTAL: Bridge<App> = Bridge::new(Core::new());
}

/// Route `log` output to the browser console
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_log::init_with_level(log::Level::Debug).expect("logger already initialized");
}

/// Process a page event, e.g. a control edit or a region being expanded
#[wasm_bindgen]
pub fn process_event(event_bytes: &[u8]) -> Vec<u8> {
    let mut effects = Vec::new();
    PORTAL
        .update(event_bytes, &mut effects)
        .expect("malformed event from page");
    effects
}

/// Current view model
#[wasm_bindgen]
pub fn view() -> Vec<u8> {
    let mut view = Vec::new();
    PORTAL.view(&mut view).expect("view model not serializable");
    view
}

/// Resolve an effect (a device request or a render) by its id
#[wasm_bindgen]
pub fn handle_response(id: u32, response_bytes: &[u8]) -> Vec<u8> {
    let mut effects = Vec::new();
    PORTAL
        .resolve(
            crux_core::bridge::EffectId(id),
            response_bytes,
            &mut effects,
        )
        .expect("malformed response from page");
    effects
}
