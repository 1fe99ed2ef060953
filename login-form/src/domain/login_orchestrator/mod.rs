//! Reactive core of the login form.
//!
//! The orchestrator is a single-owner event loop. Field edits and submit
//! presses arrive on a bounded queue and are applied strictly in order; the
//! only suspending work, the gateway call, runs on a spawned task that the
//! loop joins. At most one attempt is ever in flight.
//!
//! Observers never touch the loop directly. They hold a [`LoginFormHandle`]
//! that enqueues events and subscribes to the output channels.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::{JoinError, JoinHandle, JoinSet};

use crate::domain::ports::LoginGateway;
use crate::domain::{
    LoginFailure, RenderDirective, RequestPayload, StateUpdate, SubmissionState, User,
    ValidationPolicy,
};

mod form_state;
mod signals;

use form_state::FormState;
use signals::Signals;

/// Input accepted by the orchestrator loop.
#[derive(Clone, PartialEq, Eq)]
pub enum LoginEvent {
    /// The email field changed.
    EmailChanged(Option<String>),
    /// The password field changed.
    PasswordChanged(Option<String>),
    /// The login button was pressed.
    SubmitPressed,
}

impl fmt::Debug for LoginEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmailChanged(email) => f.debug_tuple("EmailChanged").field(email).finish(),
            Self::PasswordChanged(password) => f
                .debug_tuple("PasswordChanged")
                .field(&password.as_ref().map(|_| "<redacted>"))
                .finish(),
            Self::SubmitPressed => f.write_str("SubmitPressed"),
        }
    }
}

/// Orchestrator tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Capacity of the inbound event queue.
    pub event_capacity: usize,
    /// Capacity of each broadcast output channel. Slow observers lag rather
    /// than block the loop.
    pub signal_capacity: usize,
    /// Reporting policy for empty fields.
    pub validation_policy: ValidationPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            event_capacity: 32,
            signal_capacity: 64,
            validation_policy: ValidationPolicy::Collapsed,
        }
    }
}

/// Errors returned to handle callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    /// The orchestrator loop has ended and no longer accepts events.
    #[error("login orchestrator has stopped")]
    Stopped,
}

/// Owner of the submission state machine.
pub struct LoginOrchestrator {
    gateway: Arc<dyn LoginGateway>,
    config: OrchestratorConfig,
    form: FormState,
    signals: Arc<Signals>,
}

impl LoginOrchestrator {
    /// Build an orchestrator around a gateway.
    ///
    /// ```rust,ignore
    /// let orchestrator = LoginOrchestrator::new(Arc::new(FixtureLoginGateway), config);
    /// let (handle, task) = orchestrator.spawn();
    /// ```
    #[must_use]
    pub fn new(gateway: Arc<dyn LoginGateway>, config: OrchestratorConfig) -> Self {
        Self {
            gateway,
            form: FormState::new(config.validation_policy),
            signals: Arc::new(Signals::new(config.signal_capacity)),
            config,
        }
    }

    /// Create an event queue and a handle feeding it.
    ///
    /// Pass the receiver to [`LoginOrchestrator::run`]. The loop ends once
    /// every clone of the handle is dropped.
    #[must_use]
    pub fn connect(&self) -> (LoginFormHandle, mpsc::Receiver<LoginEvent>) {
        let (events, receiver) = mpsc::channel(self.config.event_capacity.max(1));
        let handle = LoginFormHandle {
            events,
            signals: Arc::clone(&self.signals),
        };
        (handle, receiver)
    }

    /// Run the loop on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[must_use]
    pub fn spawn(self) -> (LoginFormHandle, JoinHandle<()>) {
        let (handle, events) = self.connect();
        let task = tokio::spawn(self.run(events));
        (handle, task)
    }

    /// Process events until the queue closes, then let any in-flight attempt
    /// finish.
    pub async fn run(mut self, mut events: mpsc::Receiver<LoginEvent>) {
        let mut in_flight = JoinSet::new();
        loop {
            tokio::select! {
                received = events.recv() => match received {
                    Some(event) => self.apply(event, &mut in_flight),
                    None => break,
                },
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    self.complete(joined);
                }
            }
        }
        while let Some(joined) = in_flight.join_next().await {
            self.complete(joined);
        }
    }

    fn apply(&mut self, event: LoginEvent, in_flight: &mut JoinSet<Result<User, LoginFailure>>) {
        let valid = match event {
            LoginEvent::EmailChanged(email) => self.form.set_email(email),
            LoginEvent::PasswordChanged(password) => self.form.set_password(password),
            LoginEvent::SubmitPressed => {
                self.submit(in_flight);
                return;
            }
        };
        self.signals.emit_validity(valid);
    }

    fn submit(&self, in_flight: &mut JoinSet<Result<User, LoginFailure>>) {
        if self.signals.is_loading() || !in_flight.is_empty() {
            return;
        }
        let Ok(snapshot) = self.form.snapshot() else {
            return;
        };
        self.signals.transition(SubmissionState::Loading);
        match snapshot.encode() {
            Ok(payload) => {
                in_flight.spawn(attempt(Arc::clone(&self.gateway), payload));
            }
            Err(error) => self
                .signals
                .transition(SubmissionState::Failed(LoginFailure::from(error))),
        }
    }

    fn complete(&self, joined: Result<Result<User, LoginFailure>, JoinError>) {
        let next = match joined {
            Ok(Ok(user)) => SubmissionState::Succeeded(user),
            Ok(Err(failure)) => SubmissionState::Failed(failure),
            Err(error) => SubmissionState::Failed(LoginFailure::Interrupted {
                message: error.to_string(),
            }),
        };
        self.signals.transition(next);
    }
}

async fn attempt(
    gateway: Arc<dyn LoginGateway>,
    payload: RequestPayload,
) -> Result<User, LoginFailure> {
    let mapping = gateway.submit(&payload).await?;
    Ok(User::from_mapping(&mapping)?)
}

/// Cloneable front door to a running orchestrator.
#[derive(Clone)]
pub struct LoginFormHandle {
    events: mpsc::Sender<LoginEvent>,
    signals: Arc<Signals>,
}

impl LoginFormHandle {
    /// Report a new email field value.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::Stopped`] once the loop has ended.
    pub async fn set_email(&self, email: Option<String>) -> Result<(), OrchestratorError> {
        self.send(LoginEvent::EmailChanged(email)).await
    }

    /// Report a new password field value.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::Stopped`] once the loop has ended.
    pub async fn set_password(&self, password: Option<String>) -> Result<(), OrchestratorError> {
        self.send(LoginEvent::PasswordChanged(password)).await
    }

    /// Press the login button.
    ///
    /// Presses while the form is invalid or an attempt is in flight are
    /// dropped by the loop.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::Stopped`] once the loop has ended.
    pub async fn submit(&self) -> Result<(), OrchestratorError> {
        self.send(LoginEvent::SubmitPressed).await
    }

    /// Enqueue an arbitrary event.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::Stopped`] once the loop has ended.
    pub async fn send(&self, event: LoginEvent) -> Result<(), OrchestratorError> {
        self.events
            .send(event)
            .await
            .map_err(|_| OrchestratorError::Stopped)
    }

    /// Validity of the form after every field edit.
    ///
    /// Both fields start out empty and that initial pair is not published,
    /// so the first value arrives with the first edit. A UI that reports its
    /// blank fields on startup sees `false` for each of those reports.
    #[must_use]
    pub fn observe_form_validity(&self) -> broadcast::Receiver<bool> {
        self.signals.subscribe_validity()
    }

    /// `true` on entering `Loading`, `false` on leaving it.
    #[must_use]
    pub fn observe_loading_state(&self) -> broadcast::Receiver<bool> {
        self.signals.subscribe_loading()
    }

    /// One notification per state transition.
    #[must_use]
    pub fn observe_state_updates(&self) -> broadcast::Receiver<StateUpdate> {
        self.signals.subscribe_updates()
    }

    /// Watch the current state.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<SubmissionState> {
        self.signals.watch_state()
    }

    /// Copy of the current state.
    #[must_use]
    pub fn current_state(&self) -> SubmissionState {
        self.signals.current_state()
    }

    /// Directive for drawing the form right now.
    #[must_use]
    pub fn render_directive(&self) -> RenderDirective {
        self.signals.render_directive()
    }
}

impl fmt::Debug for LoginFormHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginFormHandle")
            .field("closed", &self.events.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
