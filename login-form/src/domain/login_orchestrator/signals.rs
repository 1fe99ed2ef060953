//! Output channels shared between the orchestrator loop and its handles.

use tokio::sync::{broadcast, watch};

use crate::domain::{RenderDirective, StateUpdate, SubmissionState, render};

/// Senders for every observable output of the orchestrator.
///
/// Only the loop writes; handles subscribe.
pub(super) struct Signals {
    state: watch::Sender<SubmissionState>,
    form_valid: watch::Sender<bool>,
    validity: broadcast::Sender<bool>,
    loading: broadcast::Sender<bool>,
    updates: broadcast::Sender<StateUpdate>,
}

impl Signals {
    pub(super) fn new(capacity: usize) -> Self {
        let bounded = capacity.max(1);
        let (state, _) = watch::channel(SubmissionState::Idle);
        let (form_valid, _) = watch::channel(false);
        let (validity, _) = broadcast::channel(bounded);
        let (loading, _) = broadcast::channel(bounded);
        let (updates, _) = broadcast::channel(bounded);
        Self {
            state,
            form_valid,
            validity,
            loading,
            updates,
        }
    }

    pub(super) fn emit_validity(&self, valid: bool) {
        self.form_valid.send_replace(valid);
        publish(&self.validity, valid);
    }

    /// Replace the current state and notify every observer.
    ///
    /// The state watch is updated before any broadcast goes out, so an
    /// observer reacting to a notification always reads the new state.
    pub(super) fn transition(&self, next: SubmissionState) {
        let loading = next.is_loading();
        let update = StateUpdate::for_state(&next);
        let previous = self.state.send_replace(next);
        if previous.is_loading() != loading {
            publish(&self.loading, loading);
        }
        if let Some(update) = update {
            publish(&self.updates, update);
        }
    }

    pub(super) fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub(super) fn current_state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    pub(super) fn render_directive(&self) -> RenderDirective {
        let form_valid = *self.form_valid.borrow();
        render(&self.state.borrow(), form_valid)
    }

    pub(super) fn watch_state(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    pub(super) fn subscribe_validity(&self) -> broadcast::Receiver<bool> {
        self.validity.subscribe()
    }

    pub(super) fn subscribe_loading(&self) -> broadcast::Receiver<bool> {
        self.loading.subscribe()
    }

    pub(super) fn subscribe_updates(&self) -> broadcast::Receiver<StateUpdate> {
        self.updates.subscribe()
    }
}

fn publish<T>(sender: &broadcast::Sender<T>, value: T) {
    // Sending only fails when nobody is subscribed.
    if let Err(unobserved) = sender.send(value) {
        drop(unobserved);
    }
}
