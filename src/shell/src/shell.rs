use anyhow::{anyhow, Result};
use crux_core::Core;
use crux_http::{protocol::HttpResult, HttpError};
use log::{debug, error};
use std::collections::VecDeque;
use wifi_portal_core::{
    App, ConfigEvent, ControlDescriptor, ControlState, Effect, Event, PortalEvent, UiEvent,
    ViewModel,
};

use crate::http_client::DeviceClient;

/// Drives the portal core: feeds it events and executes the effects it
/// requests until it settles.
pub struct Shell<D> {
    core: Core<App>,
    device: D,
}

impl<D: DeviceClient> Shell<D> {
    pub fn new(device: D) -> Self {
        Self {
            core: Core::new(),
            device,
        }
    }

    pub async fn register(&self, controls: Vec<ControlDescriptor>) -> Result<()> {
        self.dispatch(Event::Config(ConfigEvent::RegisterControls { controls }))
            .await
    }

    /// Expand a region, loading the sections its controls are bound to
    pub async fn reveal(&self, region: &str) -> Result<()> {
        self.dispatch(Event::Config(ConfigEvent::RegionToggled {
            region: region.to_string(),
            expanded: true,
        }))
        .await
    }

    pub async fn edit(&self, id: &str, state: ControlState) -> Result<()> {
        self.dispatch(Event::Config(ConfigEvent::ControlInput {
            id: id.to_string(),
            state,
        }))
        .await
    }

    /// Run the save pipeline to its end
    pub async fn save(&self) -> Result<()> {
        self.dispatch(Event::Portal(PortalEvent::Save)).await
    }

    pub async fn dismiss_error(&self) -> Result<()> {
        self.dispatch(Event::Ui(UiEvent::ClearError)).await
    }

    pub fn view(&self) -> ViewModel {
        self.core.view()
    }

    async fn dispatch(&self, event: Event) -> Result<()> {
        debug!("event: {event:?}");
        let mut effects: VecDeque<Effect> = self.core.process_event(event).into();

        while let Some(effect) = effects.pop_front() {
            match effect {
                Effect::Render(_) => {}
                Effect::Http(mut request) => {
                    let result = match self.device.send(request.operation.clone()).await {
                        Ok(response) => HttpResult::Ok(response),
                        Err(e) => {
                            error!("{e:#}");
                            HttpResult::Err(HttpError::Io(format!("{e:#}")))
                        }
                    };

                    let follow_ups = self
                        .core
                        .resolve(&mut request, result)
                        .map_err(|e| anyhow!("failed to resolve device request: {e}"))?;
                    effects.extend(follow_ups);
                }
            }
        }

        Ok(())
    }
}
