//! Test utilities for the login-form crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled only for tests or with the `test-support` feature.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Notify, mpsc};

use crate::domain::ports::{FixtureLoginGateway, GatewayError, LoginGateway};
use crate::domain::{RequestPayload, ResponseMapping};

/// One scripted gateway answer.
pub type ScriptedResponse = Result<ResponseMapping, GatewayError>;

/// Build the success mapping `{"id": id, "name": name}`.
#[must_use]
pub fn user_mapping(id: &str, name: &str) -> ResponseMapping {
    let mut mapping = ResponseMapping::new();
    mapping.insert("id".to_owned(), Value::from(id));
    mapping.insert("name".to_owned(), Value::from(name));
    mapping
}

/// Gateway double that replays scripted responses and records every body.
///
/// When the script runs dry every further call answers with the fallback
/// response. An optional release gate holds each call until the test lets
/// it through, and an optional entry channel reports the call number as soon
/// as a call arrives.
pub struct ScriptedLoginGateway {
    scripted: Mutex<VecDeque<ScriptedResponse>>,
    fallback: ScriptedResponse,
    bodies: Mutex<Vec<Vec<u8>>>,
    calls: AtomicUsize,
    entered: Option<mpsc::UnboundedSender<usize>>,
    release: Option<Arc<Notify>>,
}

impl ScriptedLoginGateway {
    /// Answer every call with `response`.
    #[must_use]
    pub fn always(response: ScriptedResponse) -> Self {
        Self::scripted(Vec::new(), response)
    }

    /// Answer every call with the fixture user `{"id": "123", "name": "TestName"}`.
    #[must_use]
    pub fn succeeding() -> Self {
        Self::always(Ok(user_mapping(
            FixtureLoginGateway::USER_ID,
            FixtureLoginGateway::USER_NAME,
        )))
    }

    /// Answer every call with `error`.
    #[must_use]
    pub fn failing(error: GatewayError) -> Self {
        Self::always(Err(error))
    }

    /// Replay `scripted` in order, then answer with `fallback`.
    #[must_use]
    pub fn scripted(scripted: Vec<ScriptedResponse>, fallback: ScriptedResponse) -> Self {
        Self {
            scripted: Mutex::new(scripted.into()),
            fallback,
            bodies: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            entered: None,
            release: None,
        }
    }

    /// Hold each call until `release` is notified.
    ///
    /// `Notify::notify_one` stores a permit, so releasing before the call
    /// arrives is fine.
    #[must_use]
    pub fn gated(self, release: Arc<Notify>) -> Self {
        Self {
            release: Some(release),
            ..self
        }
    }

    /// Report the call number on `entered` as each call arrives.
    #[must_use]
    pub fn reporting_entry(self, entered: mpsc::UnboundedSender<usize>) -> Self {
        Self {
            entered: Some(entered),
            ..self
        }
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request body received, parsed as JSON.
    ///
    /// Bodies that are not JSON are reported as `Value::Null`.
    #[must_use]
    pub fn recorded_bodies(&self) -> Vec<Value> {
        lock(&self.bodies)
            .iter()
            .map(|body| serde_json::from_slice(body).unwrap_or(Value::Null))
            .collect()
    }
}

#[async_trait]
impl LoginGateway for ScriptedLoginGateway {
    async fn submit(&self, payload: &RequestPayload) -> Result<ResponseMapping, GatewayError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        lock(&self.bodies).push(payload.as_bytes().to_vec());
        if let Some(entered) = &self.entered {
            // A test that stopped listening is not an error.
            entered.send(call).unwrap_or_default();
        }
        if let Some(release) = &self.release {
            release.notified().await;
        }
        lock(&self.scripted)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
