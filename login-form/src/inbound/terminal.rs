//! Line-oriented presenter for render directives.
//!
//! Each distinct [`RenderDirective`] becomes one line of text on any
//! [`io::Write`] sink. Repeated identical directives are collapsed.

use std::io::{self, Write};

use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;

use crate::domain::{
    ButtonTone, LoginFormHandle, RenderDirective, StateUpdate, SubmissionState,
};

/// Errors raised while presenting orchestrator output.
#[derive(Debug, Error)]
pub enum PresenterError {
    /// Writing to the sink failed.
    #[error("failed to write login form output: {0}")]
    Io(#[from] io::Error),
    /// The orchestrator went away before the attempt resolved.
    #[error("login form closed before the attempt resolved")]
    Closed,
}

/// Writes one line per render directive change.
#[derive(Debug)]
pub struct TerminalPresenter<W> {
    writer: W,
    last: Option<RenderDirective>,
}

impl<W: Write> TerminalPresenter<W> {
    /// Present onto `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer, last: None }
    }

    /// Write `directive` unless it equals the previous one.
    ///
    /// Returns whether a line was written.
    ///
    /// # Errors
    ///
    /// Returns [`PresenterError::Io`] when the sink rejects the write.
    pub fn present(&mut self, directive: RenderDirective) -> Result<bool, PresenterError> {
        if self.last == Some(directive) {
            return Ok(false);
        }
        let line = describe(directive);
        debug!(%line, "presenting login form");
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        self.last = Some(directive);
        Ok(true)
    }

    /// Recover the sink.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Present every state change until the current attempt resolves.
///
/// `updates` must be subscribed before the submit press is sent so the
/// `Loading` notification is not missed.
///
/// # Errors
///
/// Returns [`PresenterError`] when writing fails or the orchestrator stops
/// publishing first.
pub async fn present_until_resolved<W: Write>(
    handle: &LoginFormHandle,
    mut updates: broadcast::Receiver<StateUpdate>,
    presenter: &mut TerminalPresenter<W>,
) -> Result<SubmissionState, PresenterError> {
    presenter.present(handle.render_directive())?;
    loop {
        match updates.recv().await {
            Ok(StateUpdate::Loading) => {
                presenter.present(handle.render_directive())?;
            }
            Ok(StateUpdate::Finished(_) | StateUpdate::Error(_)) => {
                presenter.present(handle.render_directive())?;
                return Ok(handle.current_state());
            }
            Err(RecvError::Lagged(skipped)) => {
                debug!(skipped, "presenter lagged behind state updates");
                let state = handle.current_state();
                presenter.present(handle.render_directive())?;
                if state.is_terminal() {
                    return Ok(state);
                }
            }
            Err(RecvError::Closed) => return Err(PresenterError::Closed),
        }
    }
}

fn describe(directive: RenderDirective) -> String {
    let button = if directive.login_button.enabled {
        "enabled"
    } else {
        "disabled"
    };
    let tone = match directive.login_button.tone {
        ButtonTone::Active => "active",
        ButtonTone::Inactive => "inactive",
    };
    let mut line = format!("[login: {button}, {tone}]");
    if directive.busy_indicator {
        line.push_str(" signing in...");
    }
    if let Some(notice) = directive.notice {
        line.push(' ');
        line.push_str(notice.message());
    }
    line
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{LoginFailure, User, render};
    use crate::domain::ports::GatewayError;
    use rstest::rstest;

    fn written(presenter: TerminalPresenter<Vec<u8>>) -> String {
        String::from_utf8(presenter.into_inner()).expect("utf-8 output")
    }

    #[rstest]
    #[case(render(&SubmissionState::Idle, false), "[login: disabled, inactive]")]
    #[case(
        render(&SubmissionState::Loading, true),
        "[login: disabled, active] signing in..."
    )]
    #[case(
        render(&SubmissionState::Succeeded(User::new("123", "TestName")), true),
        "[login: enabled, active] Login succeeded."
    )]
    #[case(
        render(
            &SubmissionState::Failed(LoginFailure::Gateway(GatewayError::unknown())),
            true
        ),
        "[login: enabled, active] Login failed. Please try again."
    )]
    fn describes_each_directive(#[case] directive: RenderDirective, #[case] expected: &str) {
        assert_eq!(describe(directive), expected);
    }

    #[rstest]
    fn identical_directives_are_written_once() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        let idle = render(&SubmissionState::Idle, true);

        assert!(presenter.present(idle).expect("write"));
        assert!(!presenter.present(idle).expect("write"));
        assert!(presenter
            .present(render(&SubmissionState::Loading, true))
            .expect("write"));

        assert_eq!(
            written(presenter),
            "[login: enabled, active]\n[login: disabled, active] signing in...\n"
        );
    }
}
