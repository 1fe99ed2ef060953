//! Login form configuration loaded via OrthoConfig.
//!
//! Values resolve from CLI flags, then `LOGIN_*` environment variables, then
//! configuration files, then the defaults below.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{OrchestratorConfig, ValidationPolicy};

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080/api/v1/login";

/// Settings that fail validation after loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The endpoint override is blank.
    #[error("login endpoint must not be empty when provided")]
    EmptyEndpoint,
    /// A zero request timeout would fail every call.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Configuration values for the login form binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOGIN")]
pub struct LoginSettings {
    /// Login endpoint override.
    pub endpoint: Option<String>,
    /// Transport timeout for one login request, in seconds.
    #[ortho_config(default = 10)]
    pub request_timeout_secs: u64,
    /// Email to submit.
    pub email: Option<String>,
    /// Password to submit. Prefer `LOGIN_PASSWORD` over the CLI flag.
    pub password: Option<String>,
    /// Report which field is empty instead of one combined reason. Unset
    /// means `false`.
    pub per_field_empty_reasons: Option<bool>,
    /// Optional override for the orchestrator event queue capacity.
    pub event_queue_capacity: Option<usize>,
    /// Optional override for each orchestrator output channel capacity.
    pub signal_capacity: Option<usize>,
}

impl LoginSettings {
    /// Return the configured endpoint, falling back to the local default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::EmptyEndpoint`] for a blank override.
    pub fn endpoint(&self) -> Result<&str, SettingsError> {
        match self.endpoint.as_deref() {
            Some(value) if value.trim().is_empty() => Err(SettingsError::EmptyEndpoint),
            Some(value) => Ok(value),
            None => Ok(DEFAULT_ENDPOINT),
        }
    }

    /// Return the request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] when the timeout is zero.
    pub const fn request_timeout(&self) -> Result<Duration, SettingsError> {
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout);
        }
        Ok(Duration::from_secs(self.request_timeout_secs))
    }

    /// Return the validation policy selected by `per_field_empty_reasons`.
    #[must_use]
    pub const fn validation_policy(&self) -> ValidationPolicy {
        if matches!(self.per_field_empty_reasons, Some(true)) {
            ValidationPolicy::PerField
        } else {
            ValidationPolicy::Collapsed
        }
    }

    /// Build orchestrator tuning, keeping defaults for unset capacities.
    #[must_use]
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        let defaults = OrchestratorConfig::default();
        OrchestratorConfig {
            event_capacity: self.event_queue_capacity.unwrap_or(defaults.event_capacity),
            signal_capacity: self.signal_capacity.unwrap_or(defaults.signal_capacity),
            validation_policy: self.validation_policy(),
        }
    }
}
