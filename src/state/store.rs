//! State store with change notification
//!
//! Holds the current `AppState` in a tokio watch channel. Every dispatched
//! event goes through `AppState::apply`; subscribers only wake up when the
//! snapshot actually changed.

use tokio::sync::watch;
use tracing::debug;

use super::app::{AppState, Command, Event, PredictionState, Transition};

#[derive(Debug)]
pub struct StateStore {
    tx: watch::Sender<AppState>,
}

impl StateStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AppState::default());
        Self { tx }
    }

    /// Apply `event` and return the work it asks for, if any
    pub fn dispatch(&self, event: Event) -> Option<Command> {
        let mut command = None;

        self.tx.send_if_modified(|state| {
            let Transition { state: next, command: requested } = state.apply(event);
            command = requested;

            if next == *state {
                false
            } else {
                *state = next;
                true
            }
        });

        command
    }

    /// Current snapshot
    pub fn snapshot(&self) -> AppState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.tx.subscribe()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Log every published snapshot until the store goes away
pub async fn log_transitions(mut rx: watch::Receiver<AppState>) {
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        let predictions = match &state.predictions {
            PredictionState::Absent => "absent".to_string(),
            PredictionState::Pending { previous: Some(list) } => {
                format!("pending ({} kept)", list.len())
            }
            PredictionState::Pending { previous: None } => "pending".to_string(),
            PredictionState::Ready(list) => format!("{} ready", list.len()),
            PredictionState::Failed(e) => format!("failed ({:?})", e.kind()),
        };

        debug!(
            "State: phase={:?} permission={:?} image={} generation={} predictions={}",
            state.phase,
            state.permission,
            state
                .selected_image
                .as_ref()
                .map(|r| r.as_str())
                .unwrap_or("-"),
            state.generation,
            predictions
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquire::ImageReference;
    use crate::state::app::Phase;

    #[test]
    fn test_dispatch_returns_command_and_updates_snapshot() {
        let store = StateStore::new();

        assert_eq!(store.dispatch(Event::RuntimeReady), Some(Command::LoadModel));
        assert_eq!(store.snapshot().phase, Phase::RuntimeReady);
    }

    #[test]
    fn test_subscribers_see_changes_only() {
        let store = StateStore::new();
        let mut rx = store.subscribe();

        // Rejected: model not ready
        store.dispatch(Event::ImageSelected(ImageReference::new("a.jpg")));
        assert!(!rx.has_changed().unwrap());

        store.dispatch(Event::RuntimeReady);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().phase, Phase::RuntimeReady);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_full_flow_through_store() {
        let store = StateStore::new();
        let mut rx = store.subscribe();

        store.dispatch(Event::RuntimeReady);
        store.dispatch(Event::ModelLoaded);
        let command = store.dispatch(Event::ImageSelected(ImageReference::new("cat.jpg")));

        let Some(Command::Classify { generation, image }) = command else {
            panic!("expected a classify command");
        };
        assert_eq!(image, ImageReference::new("cat.jpg"));

        store.dispatch(Event::ClassificationFinished { generation, result: Ok(Vec::new()) });

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().predictions, PredictionState::Ready(Vec::new()));
    }

    #[tokio::test]
    async fn test_log_transitions_ends_with_store() {
        let store = StateStore::new();
        let rx = store.subscribe();
        let handle = tokio::spawn(log_transitions(rx));

        store.dispatch(Event::RuntimeReady);
        drop(store);

        handle.await.unwrap();
    }
}
