use crux_core::{render::render, Command};
use log::{debug, warn};

use crate::config::{decode_for_display, AccessError, ConfigPath, ConfigStore, ControlState, DisplayValue};
use crate::events::{ConfigEvent, Event};
use crate::model::Model;
use crate::update::loader::load_region;
use crate::types::{Binding, ControlDescriptor, ControlKind, DerivedDefault};
use crate::Effect;

/// Handle control registration and user edits
pub fn handle(event: ConfigEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        ConfigEvent::RegisterControls { controls } => handle_register_controls(controls, model),
        ConfigEvent::ControlInput { id, state } => handle_control_input(id, state, model),
        _ => unreachable!("Non-binding event passed to binding handler"),
    }
}

fn handle_register_controls(
    controls: Vec<ControlDescriptor>,
    model: &mut Model,
) -> Command<Effect, Event> {
    for descriptor in controls {
        let id = descriptor.id.clone();
        if let Err(e) = model.bindings.register(descriptor) {
            warn!("rejecting control: {e}");
            model.rejected_controls.push(id);
        }
    }

    // controls registered late still show sections that are already loaded
    let loaded: Vec<String> = model.store.section_names().cloned().collect();
    for section in loaded {
        refresh_section(model, &section);
    }

    // regions revealed before their controls existed load now
    let expanded: Vec<String> = model.expanded_regions.iter().cloned().collect();
    let mut commands = vec![render()];
    for region in expanded {
        commands.push(load_region(&region, model));
    }

    Command::all(commands)
}

fn handle_control_input(id: String, state: ControlState, model: &mut Model) -> Command<Effect, Event> {
    let Some(binding) = model.bindings.get(&id).cloned() else {
        warn!("ignoring input from unbound control '{id}'");
        return Command::done();
    };

    if !model.store.is_loaded(binding.path.section()) {
        warn!(
            "dropping edit of '{id}': section '{}' is not loaded",
            binding.path.section()
        );
        return Command::done();
    }

    let stored = model.store.apply_input(&binding.path, &state);
    debug!("'{}' = {stored}", binding.path);

    model
        .displays
        .insert(id.clone(), display_of_input(&binding.kind, &state));
    refresh_path(model, &binding.path, Some(&id));

    let rules: Vec<DerivedDefault> = model.bindings.derived_from(&binding.path).cloned().collect();
    for rule in rules {
        apply_derived_default(model, &rule, &state);
    }

    render()
}

/// Seed `rule.target` from the edited source; later edits of the target win
fn apply_derived_default(model: &mut Model, rule: &DerivedDefault, source: &ControlState) {
    if !model.store.is_loaded(rule.target.section()) {
        warn!(
            "not deriving '{}': section '{}' is not loaded",
            rule.target,
            rule.target.section()
        );
        return;
    }

    let derived = ControlState::text(format!("{}{}", source.value, rule.suffix));
    let stored = model.store.apply_input(&rule.target, &derived);
    debug!("'{}' = {stored} (derived from '{}')", rule.target, rule.source);

    refresh_path(model, &rule.target, None);
}

/// What the edited control shows: exactly what the user entered
fn display_of_input(kind: &ControlKind, state: &ControlState) -> DisplayValue {
    match kind {
        ControlKind::Input => DisplayValue::Text(state.value.clone()),
        ControlKind::MultiSelect { .. } => DisplayValue::Selected(state.selected_values()),
    }
}

/// Re-read every control bound to `section` from the store
pub(crate) fn refresh_section(model: &mut Model, section: &str) {
    let updates: Vec<(String, DisplayValue)> = model
        .bindings
        .bound_to_section(section)
        .filter_map(|binding| display_from_store(&model.store, binding))
        .collect();

    model.displays.extend(updates);
}

/// Re-read every control bound to `path`, except `skip`
fn refresh_path(model: &mut Model, path: &ConfigPath, skip: Option<&str>) {
    let updates: Vec<(String, DisplayValue)> = model
        .bindings
        .bound_to_path(path)
        .filter(|binding| Some(binding.control_id.as_str()) != skip)
        .filter_map(|binding| display_from_store(&model.store, binding))
        .collect();

    model.displays.extend(updates);
}

/// A missing section means nothing to show yet; a missing field is a
/// mismatch between page and device and leaves the control untouched.
fn display_from_store(store: &ConfigStore, binding: &Binding) -> Option<(String, DisplayValue)> {
    match store.read(&binding.path) {
        Ok(value) => Some((
            binding.control_id.clone(),
            decode_for_display(value, binding.kind.options()),
        )),
        Err(AccessError::MissingSection(_)) => None,
        Err(e @ AccessError::MissingField { .. }) => {
            warn!("control '{}': {e}", binding.control_id);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigTree;
    use crate::types::{AP_SSID_CONTROL_ID, HOSTNAME_CONTROL_ID};
    use serde_json::{json, Value};

    fn document(value: Value) -> ConfigTree {
        value.as_object().unwrap().clone()
    }

    fn portal_model() -> Model {
        let mut model = Model::default();
        let _ = handle_register_controls(
            vec![
                ControlDescriptor::input("wifiSta_config_ssid", "station"),
                ControlDescriptor::input(HOSTNAME_CONTROL_ID, "station"),
                ControlDescriptor::multi_select("wifi_country_list", "station", ["NL", "US", "--"]),
                ControlDescriptor::input(AP_SSID_CONTROL_ID, "accessPoint"),
                ControlDescriptor::input("wifiAp_config_channel", "accessPoint"),
            ],
            &mut model,
        );
        model
    }

    fn load(model: &mut Model, section: &str, value: Value) {
        model.store.insert_section(section, document(value));
        refresh_section(model, section);
    }

    mod registration {
        use super::*;

        #[test]
        fn invalid_controls_are_reported() {
            let mut model = Model::default();

            let _ = handle_register_controls(
                vec![
                    ControlDescriptor::input("webPortal_usr", "admin"),
                    ControlDescriptor::input("webPortal", "admin"),
                    ControlDescriptor::input("webPortal_usr", "admin"),
                ],
                &mut model,
            );

            assert_eq!(model.bindings.len(), 1);
            assert_eq!(model.rejected_controls, ["webPortal", "webPortal_usr"]);
        }

        #[test]
        fn late_registration_shows_loaded_values() {
            let mut model = Model::default();
            model
                .store
                .insert_section("webPortal", document(json!({ "usr": "admin" })));

            let _ = handle_register_controls(
                vec![ControlDescriptor::input("webPortal_usr", "admin")],
                &mut model,
            );

            assert_eq!(
                model.displays.get("webPortal_usr"),
                Some(&DisplayValue::Text("admin".to_string()))
            );
        }

        #[test]
        fn region_revealed_before_registration_loads_on_registration() {
            let mut model = Model::default();
            model.expanded_regions.insert("accessPoint".to_string());
            model
                .store
                .insert_section("wifi", document(json!({ "country": { "list": [] } })));

            let _ = handle_register_controls(
                vec![
                    ControlDescriptor::input(AP_SSID_CONTROL_ID, "accessPoint"),
                    ControlDescriptor::input("wifi_country_list", "accessPoint"),
                    ControlDescriptor::input("webPortal_usr", "admin"),
                ],
                &mut model,
            );

            assert_eq!(
                model.loading_sections.iter().collect::<Vec<_>>(),
                ["wifiAp"]
            );
        }
    }

    mod display {
        use super::*;

        #[test]
        fn loaded_section_populates_its_controls() {
            let mut model = portal_model();

            load(
                &mut model,
                "wifi",
                json!({ "country": { "list": ["US"] } }),
            );

            assert_eq!(
                model.displays.get("wifi_country_list"),
                Some(&DisplayValue::Selected(vec!["US".to_string()]))
            );
            assert!(!model.displays.contains_key("wifiSta_config_ssid"));
        }

        #[test]
        fn missing_field_leaves_control_unchanged() {
            let mut model = portal_model();
            model
                .displays
                .insert("wifiSta_config_ssid".to_string(), DisplayValue::Text("old".into()));

            load(&mut model, "wifiSta", json!({ "hostname": "node" }));

            assert_eq!(
                model.displays.get("wifiSta_config_ssid"),
                Some(&DisplayValue::Text("old".to_string()))
            );
            assert_eq!(
                model.displays.get(HOSTNAME_CONTROL_ID),
                Some(&DisplayValue::Text("node".to_string()))
            );
        }
    }

    mod input {
        use super::*;

        #[test]
        fn edit_is_coerced_by_loaded_type() {
            let mut model = portal_model();
            load(&mut model, "wifiAp", json!({ "config": { "ssid": "x", "channel": 1 } }));

            let _ = handle_control_input(
                "wifiAp_config_channel".to_string(),
                ControlState::text("11"),
                &mut model,
            );

            assert_eq!(model.store.section("wifiAp").unwrap()["config"]["channel"], json!(11));
            assert_eq!(
                model.displays.get("wifiAp_config_channel"),
                Some(&DisplayValue::Text("11".to_string()))
            );
        }

        #[test]
        fn multi_select_edit_drops_sentinel() {
            let mut model = portal_model();
            load(&mut model, "wifi", json!({ "country": { "list": [] } }));

            let _ = handle_control_input(
                "wifi_country_list".to_string(),
                ControlState::multi_select(&["NL", "US", "--"], &["NL", "US", "--"]),
                &mut model,
            );

            assert_eq!(
                model.store.section("wifi").unwrap()["country"]["list"],
                json!(["NL", "US"])
            );
        }

        #[test]
        fn hostname_edit_seeds_access_point_name() {
            let mut model = portal_model();
            load(&mut model, "wifiSta", json!({ "hostname": "node" }));
            load(&mut model, "wifiAp", json!({ "config": { "ssid": "node_ap" } }));

            let _ = handle_control_input(
                HOSTNAME_CONTROL_ID.to_string(),
                ControlState::text("garden"),
                &mut model,
            );

            assert_eq!(model.store.section("wifiSta").unwrap()["hostname"], json!("garden"));
            assert_eq!(
                model.store.section("wifiAp").unwrap()["config"]["ssid"],
                json!("garden_ap")
            );
            assert_eq!(
                model.displays.get(AP_SSID_CONTROL_ID),
                Some(&DisplayValue::Text("garden_ap".to_string()))
            );

            // the user can still override the derived name
            let _ = handle_control_input(
                AP_SSID_CONTROL_ID.to_string(),
                ControlState::text("custom"),
                &mut model,
            );
            assert_eq!(
                model.store.section("wifiAp").unwrap()["config"]["ssid"],
                json!("custom")
            );
            assert_eq!(model.store.section("wifiSta").unwrap()["hostname"], json!("garden"));
        }

        #[test]
        fn edit_of_unloaded_section_is_dropped() {
            let mut model = portal_model();

            let _ = handle_control_input(
                "wifiSta_config_ssid".to_string(),
                ControlState::text("home"),
                &mut model,
            );

            assert!(!model.store.is_loaded("wifiSta"));
            assert!(model.displays.is_empty());
        }

        #[test]
        fn hostname_edit_without_access_point_section_only_changes_station() {
            let mut model = portal_model();
            load(&mut model, "wifiSta", json!({ "hostname": "node" }));

            let _ = handle_control_input(
                HOSTNAME_CONTROL_ID.to_string(),
                ControlState::text("garden"),
                &mut model,
            );

            assert!(!model.store.is_loaded("wifiAp"));
            assert_eq!(model.store.section("wifiSta").unwrap()["hostname"], json!("garden"));
        }

        #[test]
        fn unbound_control_is_ignored() {
            let mut model = portal_model();
            let before = model.clone();

            let _ = handle_control_input(
                "nowhere_field".to_string(),
                ControlState::text("x"),
                &mut model,
            );

            assert_eq!(model, before);
        }
    }
}
