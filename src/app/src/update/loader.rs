use crux_core::{render::render, Command};
use log::{error, info};

use crate::config::ConfigTree;
use crate::device_get;
use crate::events::{ConfigEvent, Event};
use crate::http_helpers::section_endpoint;
use crate::model::Model;
use crate::update::binding::refresh_section;
use crate::Effect;

/// Handle region expansion and the section loads it triggers
pub fn handle(event: ConfigEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        ConfigEvent::RegionToggled { region, expanded } => {
            handle_region_toggled(region, expanded, model)
        }
        ConfigEvent::SectionLoaded { section, result } => {
            handle_section_loaded(section, result, model)
        }
        _ => unreachable!("Non-loader event passed to loader handler"),
    }
}

fn handle_region_toggled(region: String, expanded: bool, model: &mut Model) -> Command<Effect, Event> {
    if !expanded {
        return if model.expanded_regions.remove(&region) {
            render()
        } else {
            Command::done()
        };
    }

    if !model.expanded_regions.insert(region.clone()) {
        return Command::done();
    }

    let loads = load_region(&region, model);
    Command::all([render(), loads])
}

/// Fetch the sections bound in `region` that are neither loaded nor in flight
pub(crate) fn load_region(region: &str, model: &mut Model) -> Command<Effect, Event> {
    let pending: Vec<String> = model
        .bindings
        .sections_in_region(region)
        .into_iter()
        .filter(|section| !model.store.is_loaded(section))
        .filter(|section| !model.loading_sections.contains(section))
        .collect();

    if pending.is_empty() {
        return Command::done();
    }

    info!("loading {pending:?} for region '{region}'");

    let loads: Vec<Command<Effect, Event>> = pending
        .into_iter()
        .map(|section| {
            model.loading_sections.insert(section.clone());
            let endpoint = section_endpoint(&section);
            device_get!(
                Config,
                &endpoint,
                format!("Load {section}"),
                expect_json: ConfigTree,
                map: move |result| ConfigEvent::SectionLoaded { section, result }
            )
        })
        .collect();

    Command::all(loads)
}

fn handle_section_loaded(
    section: String,
    result: Result<ConfigTree, String>,
    model: &mut Model,
) -> Command<Effect, Event> {
    model.loading_sections.remove(&section);

    match result {
        // the first delivery wins; local edits are never overwritten
        Ok(_) if model.store.is_loaded(&section) => Command::done(),
        Ok(document) => {
            info!("section '{section}' loaded");
            model.store.insert_section(&section, document);
            refresh_section(model, &section);
            render()
        }
        Err(e) => {
            error!("loading section '{section}' failed: {e}");
            model.error_message = Some(e);
            render()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayValue;
    use crate::types::ControlDescriptor;
    use serde_json::json;

    fn model_with_controls() -> Model {
        let mut model = Model::default();
        for descriptor in [
            ControlDescriptor::input("wifiSta_config_ssid", "station"),
            ControlDescriptor::input("wifiSta_hostname", "station"),
            ControlDescriptor::input("wifi_country", "station"),
            ControlDescriptor::input("webPortal_usr", "admin"),
        ] {
            model.bindings.register(descriptor).unwrap();
        }
        model
    }

    fn document(value: serde_json::Value) -> ConfigTree {
        value.as_object().unwrap().clone()
    }

    mod region {
        use super::*;

        #[test]
        fn expanding_marks_each_section_in_flight_once() {
            let mut model = model_with_controls();

            let _ = handle_region_toggled("station".to_string(), true, &mut model);

            assert!(model.expanded_regions.contains("station"));
            assert_eq!(
                model.loading_sections.iter().collect::<Vec<_>>(),
                ["wifi", "wifiSta"]
            );
        }

        #[test]
        fn loaded_and_in_flight_sections_are_not_fetched_again() {
            let mut model = model_with_controls();
            model.loading_sections.insert("wifi".to_string());
            model
                .store
                .insert_section("wifiSta", document(json!({ "hostname": "node" })));

            let _ = handle_region_toggled("station".to_string(), true, &mut model);

            assert_eq!(model.loading_sections.len(), 1);
        }

        #[test]
        fn collapse_keeps_loaded_data() {
            let mut model = model_with_controls();
            model
                .store
                .insert_section("webPortal", document(json!({ "usr": "admin" })));
            model.expanded_regions.insert("admin".to_string());

            let _ = handle_region_toggled("admin".to_string(), false, &mut model);

            assert!(model.expanded_regions.is_empty());
            assert!(model.store.is_loaded("webPortal"));
        }

        #[test]
        fn unknown_region_loads_nothing() {
            let mut model = model_with_controls();

            let _ = handle_region_toggled("advanced".to_string(), true, &mut model);

            assert!(model.loading_sections.is_empty());
        }
    }

    mod loaded {
        use super::*;

        #[test]
        fn success_stores_section_and_updates_controls() {
            let mut model = model_with_controls();
            model.loading_sections.insert("webPortal".to_string());

            let _ = handle_section_loaded(
                "webPortal".to_string(),
                Ok(document(json!({ "usr": "admin", "pwd": "" }))),
                &mut model,
            );

            assert!(model.loading_sections.is_empty());
            assert!(model.store.is_loaded("webPortal"));
            assert_eq!(
                model.displays.get("webPortal_usr"),
                Some(&DisplayValue::Text("admin".to_string()))
            );
        }

        #[test]
        fn failure_sets_error_and_leaves_section_unloaded() {
            let mut model = model_with_controls();
            model.loading_sections.insert("wifiSta".to_string());

            let _ = handle_section_loaded(
                "wifiSta".to_string(),
                Err("Load wifiSta failed: HTTP 404 Not Found (Empty body)".to_string()),
                &mut model,
            );

            assert!(model.loading_sections.is_empty());
            assert!(!model.store.is_loaded("wifiSta"));
            assert!(model.error_message.as_deref().unwrap().contains("404"));
        }

        #[test]
        fn second_delivery_does_not_overwrite_edits() {
            let mut model = model_with_controls();
            model
                .store
                .insert_section("webPortal", document(json!({ "usr": "edited" })));

            let _ = handle_section_loaded(
                "webPortal".to_string(),
                Ok(document(json!({ "usr": "admin" }))),
                &mut model,
            );

            assert_eq!(model.store.section("webPortal").unwrap()["usr"], json!("edited"));
        }
    }
}
