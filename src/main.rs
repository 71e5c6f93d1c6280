use iced::widget::{column, container, text};
use iced::{Alignment, Element, Length, Task, Theme};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod acquire;
mod classify;
mod config;
mod error;
mod model;
mod state;
mod tensor;
mod ui;

use acquire::{pick_image, request_permission, PermissionKind, PermissionStatus, PickOptions, PickOutcome};
use classify::Pipeline;
use config::AppConfig;
use error::{ClassifyError, ModelError};
use model::{Classifier, ModelAssets, Prediction};
use state::store::log_transitions;
use state::{Command, Event, StateStore};
use tensor::ImageDecoder;

/// Main application state
struct PhotoClassifier {
    /// Presentation state; every change goes through `StateStore::dispatch`
    store: StateStore,
    config: AppConfig,
    /// Held between "runtime ready" and the model load it triggers
    pending_assets: Option<ModelAssets>,
    /// Available once the model is loaded
    pipeline: Option<Pipeline>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Model asset checked and labels read
    RuntimeReady(Result<ModelAssets, ModelError>),
    /// Model graph parsed and optimized
    ModelLoaded(Result<Arc<dyn Classifier>, ModelError>),
    PermissionResolved(PermissionStatus),
    /// User clicked the image slot
    PickImage,
    Picked(PickOutcome),
    Classified {
        generation: u64,
        result: Result<Vec<Prediction>, ClassifyError>,
    },
    /// The state observer stopped
    ObserverStopped,
}

impl PhotoClassifier {
    /// Create the app and kick off boot, permission check and state logging
    fn new() -> (Self, Task<Message>) {
        let config = AppConfig::load().unwrap_or_else(|e| {
            warn!("{}; using default config", e);
            AppConfig::default()
        });

        info!("🖼️  Photo classifier starting, model at {}", config.model.model_path.display());

        let store = StateStore::new();

        // Log every state snapshot at debug level
        let observer = Task::perform(log_transitions(store.subscribe()), |_| Message::ObserverStopped);
        let boot = Task::perform(model::runtime_ready(config.model.clone()), Message::RuntimeReady);
        let permission = Task::perform(
            request_permission(PermissionKind::PhotoLibrary, config.picker.library_dir.clone()),
            Message::PermissionResolved,
        );

        (
            PhotoClassifier {
                store,
                config,
                pending_assets: None,
                pipeline: None,
            },
            Task::batch([observer, boot, permission]),
        )
    }

    /// Translate messages into state events and run whatever they ask for
    fn update(&mut self, message: Message) -> Task<Message> {
        let event = match message {
            Message::RuntimeReady(Ok(assets)) => {
                // Keep the assets for the model load this transition asks for
                self.pending_assets = Some(assets);
                Event::RuntimeReady
            }
            Message::RuntimeReady(Err(e)) => {
                error!("❌ Runtime initialization failed: {}", e);
                Event::RuntimeFailed(e.to_string())
            }
            Message::ModelLoaded(Ok(classifier)) => {
                // From here on selections can be classified
                self.pipeline = Some(Pipeline::new(Arc::new(ImageDecoder), classifier));
                Event::ModelLoaded
            }
            Message::ModelLoaded(Err(e)) => {
                error!("❌ Model loading failed: {}", e);
                Event::ModelFailed(e.to_string())
            }
            Message::PermissionResolved(status) => Event::PermissionResolved(status),
            Message::PickImage => Event::PickRequested,
            Message::Picked(PickOutcome::Cancelled) => Event::PickCancelled,
            Message::Picked(PickOutcome::Picked(reference)) => {
                info!("📷 Selected {}", reference);
                Event::ImageSelected(reference)
            }
            Message::Classified { generation, result } => {
                Event::ClassificationFinished { generation, result }
            }
            Message::ObserverStopped => return Task::none(),
        };

        // The state machine decides whether the event is accepted and what to start
        match self.store.dispatch(event) {
            Some(command) => self.run(command),
            None => Task::none(),
        }
    }

    fn run(&mut self, command: Command) -> Task<Message> {
        match command {
            Command::LoadModel => match self.pending_assets.take() {
                Some(assets) => Task::perform(model::load(assets), Message::ModelLoaded),
                None => {
                    warn!("Model load requested without runtime assets");
                    Task::none()
                }
            },
            // Show the native file picker dialog
            Command::OpenPicker => Task::perform(
                pick_image(PickOptions::from(&self.config.picker)),
                Message::Picked,
            ),
            Command::Classify { generation, image } => match &self.pipeline {
                Some(pipeline) => {
                    // Launch the classification; the generation tags the result
                    let pipeline = pipeline.clone();
                    Task::perform(async move { pipeline.classify(image).await }, move |result| {
                        Message::Classified { generation, result }
                    })
                }
                None => {
                    warn!("Classification requested before the model was loaded");
                    Task::none()
                }
            },
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let snapshot = self.store.snapshot();

        let content = column![
            text("Photo Classifier").size(32),
            ui::panels::status_panel(&snapshot),
            ui::panels::image_slot(&snapshot),
            ui::panels::prediction_panel(&snapshot),
        ]
        .spacing(30)
        .padding(40)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("photo_classifier=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> iced::Result {
    init_logging();

    iced::application(
        "Photo Classifier",
        PhotoClassifier::update,
        PhotoClassifier::view,
    )
    .theme(PhotoClassifier::theme)
    .centered()
    .run_with(PhotoClassifier::new)
}
