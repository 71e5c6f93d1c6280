/// State management module
///
/// This module holds the presentation state of the app:
/// - Immutable `AppState` snapshots and the pure transition function (app.rs)
/// - The store that applies events and notifies subscribers (store.rs)

pub mod app;
pub mod store;

pub use app::{AppState, Command, Event, Phase, PredictionState};
pub use store::StateStore;
