//! Inbound adapters that drive the login form and draw its output.
//!
//! Adapters translate between user-facing surfaces and the orchestrator
//! handle. They hold no form rules of their own.

mod terminal;

pub use terminal::{PresenterError, TerminalPresenter, present_until_resolved};
