//! Panels of the main window
//!
//! Each panel is built from a state snapshot and owns all of its text, so
//! the returned elements do not borrow from the snapshot.

use iced::widget::{button, container, image, text, Column};
use iced::{Alignment, Color, Element, Length};

use crate::acquire::PermissionStatus;
use crate::model::Prediction;
use crate::state::{AppState, Phase, PredictionState};
use crate::Message;

const PREVIEW_SIZE: f32 = 250.0;
const ERROR_COLOR: Color = Color::from_rgb(0.95, 0.45, 0.45);

/// Runtime / model readiness lines
pub fn status_lines(state: &AppState) -> Vec<String> {
    let runtime = format!("Runtime ready? {}", if state.runtime_ready() { "✅" } else { "" });

    let model = match &state.phase {
        Phase::ModelReady => "Model ready.".to_string(),
        Phase::Unavailable(reason) => format!("Model unavailable: {}", reason),
        Phase::Booting | Phase::RuntimeReady => "Loading model...".to_string(),
    };

    vec![runtime, model]
}

/// Lines under the image; empty until there is something to say
pub fn prediction_lines(state: &AppState) -> Vec<String> {
    if !state.model_ready() || state.selected_image.is_none() {
        return Vec::new();
    }

    match &state.predictions {
        PredictionState::Absent | PredictionState::Pending { previous: None } => {
            vec!["Predictions: Predicting...".to_string()]
        }
        PredictionState::Pending { previous: Some(previous) } => {
            with_header("Predictions: Predicting...", previous)
        }
        PredictionState::Ready(predictions) if predictions.is_empty() => {
            vec!["Predictions: none".to_string()]
        }
        PredictionState::Ready(predictions) => with_header("Predictions:", predictions),
        PredictionState::Failed(error) => vec![
            format!("Predictions: {}", error.kind().describe()),
            error.to_string(),
        ],
    }
}

fn with_header(header: &str, predictions: &[Prediction]) -> Vec<String> {
    std::iter::once(header.to_string())
        .chain(predictions.iter().map(|p| {
            format!("Class: {}  Probability: {:.4}", p.label, p.probability)
        }))
        .collect()
}

pub fn status_panel<'a>(state: &AppState) -> Element<'a, Message> {
    let lines: Vec<Element<'a, Message>> = status_lines(state)
        .into_iter()
        .map(|line| text(line).size(16).into())
        .collect();

    Column::with_children(lines)
        .spacing(10)
        .align_x(Alignment::Center)
        .into()
}

/// The image preview; clicking it opens the picker once picking is allowed
pub fn image_slot<'a>(state: &AppState) -> Element<'a, Message> {
    let content: Element<'a, Message> = match &state.selected_image {
        Some(reference) => match reference.resolve() {
            Ok(path) => image(image::Handle::from_path(path))
                .width(Length::Fixed(PREVIEW_SIZE))
                .height(Length::Fixed(PREVIEW_SIZE))
                .into(),
            Err(_) => text(reference.file_name()).into(),
        },
        None if state.permission == PermissionStatus::Denied => {
            text("Photo library access denied").color(ERROR_COLOR).into()
        }
        None if state.model_ready() => text("Tap to choose image").into(),
        None => text("").into(),
    };

    let slot = container(content)
        .width(Length::Fixed(PREVIEW_SIZE))
        .height(Length::Fixed(PREVIEW_SIZE))
        .center_x(Length::Fixed(PREVIEW_SIZE))
        .center_y(Length::Fixed(PREVIEW_SIZE));

    button(slot)
        .on_press_maybe(state.can_pick().then_some(Message::PickImage))
        .padding(10)
        .into()
}

pub fn prediction_panel<'a>(state: &AppState) -> Element<'a, Message> {
    let failed = matches!(state.predictions, PredictionState::Failed(_));

    let lines: Vec<Element<'a, Message>> = prediction_lines(state)
        .into_iter()
        .map(|line| -> Element<'a, Message> {
            let line = text(line).size(16);
            if failed {
                line.color(ERROR_COLOR).into()
            } else {
                line.into()
            }
        })
        .collect();

    Column::with_children(lines)
        .spacing(8)
        .width(Length::Fill)
        .align_x(Alignment::Center)
        .into()
}
