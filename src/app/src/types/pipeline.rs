//! Save/restart task queue
//!
//! One upload per loaded section in load order, then the restart. Tasks run
//! one at a time and the first failure drops everything still queued.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::ConfigStore;
use crate::http_helpers::{section_endpoint, DEVICE_STORE_PREFIX, RESTART_RESOURCE};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("saving section '{section}' failed: {reason}")]
    Upload { section: String, reason: String },
    #[error("restarting the device failed: {reason}")]
    Restart { reason: String },
    #[error("section '{section}' cannot be serialized: {reason}")]
    Serialize { section: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTask {
    /// Section document captured when the save was triggered
    Upload { section: String, body: String },
    Restart,
}

impl SaveTask {
    pub fn endpoint(&self) -> String {
        match self {
            SaveTask::Upload { section, .. } => section_endpoint(section),
            SaveTask::Restart => format!("{DEVICE_STORE_PREFIX}{RESTART_RESOURCE}"),
        }
    }

    pub fn label(&self) -> String {
        match self {
            SaveTask::Upload { section, .. } => format!("Save {section}"),
            SaveTask::Restart => "Restart".to_string(),
        }
    }

    fn failure(&self, reason: String) -> PipelineError {
        match self {
            SaveTask::Upload { section, .. } => PipelineError::Upload {
                section: section.clone(),
                reason,
            },
            SaveTask::Restart => PipelineError::Restart { reason },
        }
    }
}

/// Progress of the save pipeline as shown to the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveState {
    #[default]
    Idle,
    Running {
        step: usize,
        total: usize,
        task: String,
    },
    Completed,
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavePipeline {
    queue: VecDeque<SaveTask>,
    current: Option<SaveTask>,
    total: usize,
    state: SaveState,
}

impl SavePipeline {
    /// Queue an upload per loaded section, then the restart
    pub fn plan(store: &ConfigStore) -> Result<Self, PipelineError> {
        let mut queue = store
            .section_names()
            .map(|section| {
                let document = store.section(section).cloned().unwrap_or_default();
                serde_json::to_string(&document)
                    .map(|body| SaveTask::Upload {
                        section: section.clone(),
                        body,
                    })
                    .map_err(|e| PipelineError::Serialize {
                        section: section.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<VecDeque<_>, _>>()?;
        queue.push_back(SaveTask::Restart);

        Ok(Self {
            total: queue.len(),
            queue,
            current: None,
            state: SaveState::Idle,
        })
    }

    /// Take the next task into flight. `None` once the queue is drained or
    /// while another task is still in flight.
    pub fn start_next(&mut self) -> Option<&SaveTask> {
        if self.current.is_some() {
            return None;
        }

        let task = self.queue.pop_front()?;
        self.state = SaveState::Running {
            step: self.total - self.queue.len(),
            total: self.total,
            task: task.label(),
        };
        self.current = Some(task);
        self.current.as_ref()
    }

    /// Settle the task in flight. A failure stops the pipeline for good.
    pub fn settle(&mut self, result: Result<(), String>) -> Result<(), PipelineError> {
        let Some(task) = self.current.take() else {
            return Ok(());
        };

        match result {
            Ok(()) => {
                if self.queue.is_empty() {
                    self.state = SaveState::Completed;
                }
                Ok(())
            }
            Err(reason) => {
                let error = task.failure(reason);
                self.queue.clear();
                self.state = SaveState::Failed {
                    message: error.to_string(),
                };
                Err(error)
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some() || (!self.queue.is_empty() && !self.is_failed())
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, SaveState::Failed { .. })
    }

    pub fn current(&self) -> Option<&SaveTask> {
        self.current.as_ref()
    }

    pub fn pending(&self) -> impl Iterator<Item = &SaveTask> {
        self.queue.iter()
    }

    pub fn state(&self) -> &SaveState {
        &self.state
    }
}
