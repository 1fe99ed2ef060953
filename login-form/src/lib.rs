//! Validation and submission orchestration core for an email/password login form.
//!
//! The crate is laid out as a small hexagon:
//!
//! - [`domain`] holds the pure validation, encoding, and decoding rules, the
//!   [`domain::ports::LoginGateway`] port, and the orchestrator that turns
//!   field edits and submit presses into observable state.
//! - [`outbound`] provides the reqwest-backed gateway adapter.
//! - [`inbound`] provides a terminal presenter that renders orchestrator
//!   output for a user.
//! - [`config`] loads runtime settings through `OrthoConfig`.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
