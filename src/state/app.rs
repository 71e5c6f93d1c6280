//! Application state machine
//!
//! `AppState` is a plain value. `apply` never mutates it; it returns the next
//! snapshot plus, at most, one piece of work for the UI loop to start.
//!
//! Classification requests form a single slot keyed by `generation`: every
//! accepted selection bumps the generation, and a finished classification
//! whose generation is not the current one is dropped.

use tracing::{debug, warn};

use crate::acquire::{ImageReference, PermissionStatus};
use crate::error::ClassifyError;
use crate::model::Prediction;

/// Boot progress. Only ever moves forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Booting,
    RuntimeReady,
    ModelReady,
    /// Boot failed; the reason is shown instead of the picker
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionState {
    /// Nothing classified yet
    Absent,
    /// A classification for the current selection is in flight; the
    /// previous list stays on screen until it finishes
    Pending { previous: Option<Vec<Prediction>> },
    Ready(Vec<Prediction>),
    Failed(ClassifyError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub phase: Phase,
    pub permission: PermissionStatus,
    pub selected_image: Option<ImageReference>,
    pub predictions: PredictionState,
    /// Bumped on every accepted selection
    pub generation: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            phase: Phase::Booting,
            permission: PermissionStatus::Undetermined,
            selected_image: None,
            predictions: PredictionState::Absent,
            generation: 0,
        }
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone)]
pub enum Event {
    RuntimeReady,
    RuntimeFailed(String),
    ModelLoaded,
    ModelFailed(String),
    PermissionResolved(PermissionStatus),
    PickRequested,
    PickCancelled,
    ImageSelected(ImageReference),
    ClassificationFinished {
        generation: u64,
        result: Result<Vec<Prediction>, ClassifyError>,
    },
}

/// Work the UI loop should start after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadModel,
    OpenPicker,
    Classify {
        generation: u64,
        image: ImageReference,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: AppState,
    pub command: Option<Command>,
}

impl Transition {
    fn to(state: AppState) -> Self {
        Self { state, command: None }
    }

    fn with(state: AppState, command: Command) -> Self {
        Self {
            state,
            command: Some(command),
        }
    }
}

impl AppState {
    pub fn runtime_ready(&self) -> bool {
        matches!(self.phase, Phase::RuntimeReady | Phase::ModelReady)
    }

    pub fn model_ready(&self) -> bool {
        self.phase == Phase::ModelReady
    }

    /// Predictions currently on screen, including ones kept while the
    /// next classification runs
    pub fn visible_predictions(&self) -> Option<&[Prediction]> {
        match &self.predictions {
            PredictionState::Ready(list) => Some(list.as_slice()),
            PredictionState::Pending { previous } => previous.as_deref(),
            PredictionState::Absent | PredictionState::Failed(_) => None,
        }
    }

    /// Picking (and therefore classifying) needs a model and library access
    pub fn can_pick(&self) -> bool {
        self.model_ready() && self.permission.allows_picking()
    }

    /// Compute the next state for `event`
    ///
    /// Events that do not fit the current state leave it unchanged and
    /// start nothing.
    pub fn apply(&self, event: Event) -> Transition {
        let mut next = self.clone();

        match event {
            Event::RuntimeReady if self.phase == Phase::Booting => {
                next.phase = Phase::RuntimeReady;
                Transition::with(next, Command::LoadModel)
            }
            Event::ModelLoaded if self.phase == Phase::RuntimeReady => {
                next.phase = Phase::ModelReady;
                Transition::to(next)
            }
            Event::RuntimeFailed(reason) | Event::ModelFailed(reason) if !self.model_ready() => {
                next.phase = Phase::Unavailable(reason);
                Transition::to(next)
            }
            Event::PermissionResolved(status) => {
                next.permission = status;
                Transition::to(next)
            }
            Event::PickRequested if self.can_pick() => Transition::with(next, Command::OpenPicker),
            Event::ImageSelected(image) if self.can_pick() => {
                next.generation += 1;
                next.selected_image = Some(image.clone());
                // Keep whatever is showing until the new result lands
                let previous = self.visible_predictions().map(<[Prediction]>::to_vec);
                next.predictions = PredictionState::Pending { previous };
                let generation = next.generation;
                Transition::with(next, Command::Classify { generation, image })
            }
            Event::ClassificationFinished { generation, result } => {
                if generation != self.generation {
                    debug!(
                        "Dropping stale classification (generation {}, current {})",
                        generation, self.generation
                    );
                    return Transition::to(next);
                }

                next.predictions = match result {
                    Ok(predictions) => PredictionState::Ready(predictions),
                    Err(error) => {
                        warn!("Classification failed: {}", error);
                        PredictionState::Failed(error)
                    }
                };
                Transition::to(next)
            }
            other => {
                debug!("Ignoring {:?} in phase {:?}", other, self.phase);
                Transition::to(next)
            }
        }
    }
}
