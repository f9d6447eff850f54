use crux_core::{render::render, Command};
use log::{error, info, warn};

use crate::device_post;
use crate::events::{Event, PortalEvent};
use crate::model::Model;
use crate::types::{SavePipeline, SaveTask};
use crate::Effect;

pub const SAVE_SUCCESS_MESSAGE: &str = "Settings saved, device is restarting";

/// Handle the save/restart pipeline
pub fn handle(event: PortalEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        PortalEvent::Save => handle_save(model),
        PortalEvent::SaveTaskSettled(result) => handle_task_settled(result, model),
    }
}

fn handle_save(model: &mut Model) -> Command<Effect, Event> {
    if model.save_pipeline.is_running() {
        warn!("save already in progress");
        return Command::done();
    }

    match SavePipeline::plan(&model.store) {
        Ok(pipeline) => {
            model.save_pipeline = pipeline;
            model.error_message = None;
            model.success_message = None;
            start_next_task(model)
        }
        Err(e) => {
            error!("{e}");
            model.set_error_and_render(e.to_string())
        }
    }
}

fn start_next_task(model: &mut Model) -> Command<Effect, Event> {
    let Some(task) = model.save_pipeline.start_next().cloned() else {
        return render();
    };

    info!("{}", task.label());
    model.start_loading();

    let endpoint = task.endpoint();
    let action = task.label();
    let request = match task {
        SaveTask::Upload { body, .. } => device_post!(
            Portal,
            &endpoint,
            action,
            body_string: body,
            map: PortalEvent::SaveTaskSettled
        ),
        SaveTask::Restart => device_post!(
            Portal,
            &endpoint,
            action,
            map: PortalEvent::SaveTaskSettled
        ),
    };

    Command::all([render(), request])
}

fn handle_task_settled(result: Result<(), String>, model: &mut Model) -> Command<Effect, Event> {
    if model.save_pipeline.current().is_none() {
        warn!("no save task in flight, ignoring its result");
        return Command::done();
    }

    model.stop_loading();

    match model.save_pipeline.settle(result) {
        Ok(()) if model.save_pipeline.is_running() => start_next_task(model),
        Ok(()) => {
            info!("settings saved, device is restarting");
            model.success_message = Some(SAVE_SUCCESS_MESSAGE.to_string());
            render()
        }
        Err(e) => {
            error!("{e}");
            model.set_error_and_render(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaveState;
    use serde_json::json;

    fn model_with_sections() -> Model {
        let mut model = Model::default();
        model
            .store
            .insert_section("wifiSta", json!({ "hostname": "node" }).as_object().unwrap().clone());
        model
            .store
            .insert_section("webPortal", json!({ "usr": "admin" }).as_object().unwrap().clone());
        model
    }

    #[test]
    fn save_starts_first_upload() {
        let mut model = model_with_sections();

        let _ = handle_save(&mut model);

        assert!(model.is_loading);
        assert_eq!(
            model.save_pipeline.current(),
            Some(&SaveTask::Upload {
                section: "wifiSta".to_string(),
                body: r#"{"hostname":"node"}"#.to_string(),
            })
        );
        assert_eq!(model.save_pipeline.pending().count(), 2);
    }

    #[test]
    fn save_while_running_is_ignored() {
        let mut model = model_with_sections();
        let _ = handle_save(&mut model);
        let before = model.clone();

        let _ = handle_save(&mut model);

        assert_eq!(model, before);
    }

    #[test]
    fn pipeline_runs_to_restart_and_reports_success() {
        let mut model = model_with_sections();
        let _ = handle_save(&mut model);

        let _ = handle_task_settled(Ok(()), &mut model);
        assert_eq!(
            model.save_pipeline.current().map(SaveTask::label),
            Some("Save webPortal".to_string())
        );

        let _ = handle_task_settled(Ok(()), &mut model);
        assert_eq!(model.save_pipeline.current(), Some(&SaveTask::Restart));

        let _ = handle_task_settled(Ok(()), &mut model);
        assert_eq!(model.save_pipeline.state(), &SaveState::Completed);
        assert_eq!(model.success_message.as_deref(), Some(SAVE_SUCCESS_MESSAGE));
        assert!(!model.is_loading);
    }

    #[test]
    fn failed_upload_stops_before_restart() {
        let mut model = model_with_sections();
        let _ = handle_save(&mut model);

        let _ = handle_task_settled(
            Err("Save wifiSta failed: HTTP 500 Internal Server Error (Empty body)".to_string()),
            &mut model,
        );

        assert!(model.save_pipeline.current().is_none());
        assert!(model.save_pipeline.is_failed());
        assert!(model.error_message.as_deref().unwrap().contains("wifiSta"));
        assert_eq!(model.success_message, None);
        assert!(!model.is_loading);
    }

    #[test]
    fn save_after_failure_starts_over() {
        let mut model = model_with_sections();
        let _ = handle_save(&mut model);
        let _ = handle_task_settled(Err("timeout".to_string()), &mut model);

        let _ = handle_save(&mut model);

        assert_eq!(
            model.save_pipeline.current().map(SaveTask::label),
            Some("Save wifiSta".to_string())
        );
        assert_eq!(model.error_message, None);
    }

    #[test]
    fn settle_without_task_in_flight_is_ignored() {
        let mut model = model_with_sections();
        let _ = handle_save(&mut model);
        let _ = handle_task_settled(Err("timeout".to_string()), &mut model);
        let before = model.clone();

        let _ = handle_task_settled(Ok(()), &mut model);

        assert_eq!(model, before);
    }
}
