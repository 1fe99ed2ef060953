//! Render directives derived from orchestrator state.
//!
//! The UI layer owns every pixel; the domain only says what should be shown.
//! [`render`] is a pure function of the submission state and the latest form
//! validity signal.

use super::SubmissionState;

/// Visual emphasis of the login button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonTone {
    /// The form is valid.
    Active,
    /// The form is invalid or has not signalled yet.
    Inactive,
}

/// How the login button should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonDirective {
    /// Whether presses should reach the orchestrator.
    pub enabled: bool,
    /// Visual emphasis.
    pub tone: ButtonTone,
}

/// Generic notice shown when an attempt resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The attempt authenticated a user.
    LoginSucceeded,
    /// The attempt failed for any reason.
    LoginFailed,
}

impl Notice {
    /// Message shown to the user.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::LoginSucceeded => "Login succeeded.",
            Self::LoginFailed => "Login failed. Please try again.",
        }
    }
}

/// Everything the UI layer needs to draw the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderDirective {
    /// Login button appearance.
    pub login_button: ButtonDirective,
    /// Whether to show a busy indicator.
    pub busy_indicator: bool,
    /// Notice for the latest resolved attempt.
    pub notice: Option<Notice>,
}

/// Derive the render directive for a state and form validity.
///
/// # Examples
/// ```
/// use login_form::domain::{ButtonTone, SubmissionState, render};
///
/// let directive = render(&SubmissionState::Loading, true);
/// assert!(directive.busy_indicator);
/// assert!(!directive.login_button.enabled);
/// assert_eq!(directive.login_button.tone, ButtonTone::Active);
/// ```
#[must_use]
pub const fn render(state: &SubmissionState, form_valid: bool) -> RenderDirective {
    let loading = state.is_loading();
    let notice = match state {
        SubmissionState::Succeeded(_) => Some(Notice::LoginSucceeded),
        SubmissionState::Failed(_) => Some(Notice::LoginFailed),
        SubmissionState::Idle | SubmissionState::Loading => None,
    };
    RenderDirective {
        login_button: ButtonDirective {
            enabled: form_valid && !loading,
            tone: if form_valid {
                ButtonTone::Active
            } else {
                ButtonTone::Inactive
            },
        },
        busy_indicator: loading,
        notice,
    }
}
