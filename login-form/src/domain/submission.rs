//! Submission lifecycle states and failures.

use thiserror::Error;

use super::ports::GatewayError;
use super::{EncodingError, User, UserDecodeError};

/// Terminal failure of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginFailure {
    /// The request body could not be encoded.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    /// The gateway reported a failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// The gateway succeeded but the payload did not describe a user.
    #[error("login response data was invalid: {0}")]
    InvalidResponseData(UserDecodeError),
    /// The submission task ended without producing a result.
    #[error("login submission was interrupted: {message}")]
    Interrupted {
        /// Why the task ended.
        message: String,
    },
}

impl From<UserDecodeError> for LoginFailure {
    fn from(value: UserDecodeError) -> Self {
        Self::InvalidResponseData(value)
    }
}

/// The single externally observed state of the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    /// No attempt has been made yet.
    #[default]
    Idle,
    /// An attempt is in flight.
    Loading,
    /// The latest attempt authenticated a user.
    Succeeded(User),
    /// The latest attempt failed.
    Failed(LoginFailure),
}

impl SubmissionState {
    /// Whether an attempt is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Whether the latest attempt has resolved.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }
}

/// Notification published to the UI layer on every state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateUpdate {
    /// An attempt started.
    Loading,
    /// An attempt succeeded.
    Finished(User),
    /// An attempt failed.
    Error(LoginFailure),
}

impl StateUpdate {
    /// Map a state to its notification. `Idle` has none.
    #[must_use]
    pub fn for_state(state: &SubmissionState) -> Option<Self> {
        match state {
            SubmissionState::Idle => None,
            SubmissionState::Loading => Some(Self::Loading),
            SubmissionState::Succeeded(user) => Some(Self::Finished(user.clone())),
            SubmissionState::Failed(failure) => Some(Self::Error(failure.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SubmissionState::Idle, None)]
    #[case(SubmissionState::Loading, Some(StateUpdate::Loading))]
    #[case(
        SubmissionState::Succeeded(User::new("123", "TestName")),
        Some(StateUpdate::Finished(User::new("123", "TestName")))
    )]
    #[case(
        SubmissionState::Failed(LoginFailure::Gateway(GatewayError::unknown())),
        Some(StateUpdate::Error(LoginFailure::Gateway(GatewayError::unknown())))
    )]
    fn every_non_idle_state_has_a_notification(
        #[case] state: SubmissionState,
        #[case] expected: Option<StateUpdate>,
    ) {
        assert_eq!(StateUpdate::for_state(&state), expected);
    }

    #[rstest]
    fn decoding_failures_stay_distinct_from_gateway_failures() {
        let failure = LoginFailure::from(UserDecodeError::MissingName);
        assert!(matches!(failure, LoginFailure::InvalidResponseData(_)));
        assert_eq!(
            failure.to_string(),
            "login response data was invalid: response is missing a string `name`"
        );
    }
}
