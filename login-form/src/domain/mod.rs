//! Domain primitives and orchestration for the login form.
//!
//! Purpose: hold the rules of the form (validation, request encoding, user
//! decoding, submission lifecycle) without any transport or presentation
//! concerns. Adapters reach the outside world through [`ports`].
//!
//! Public surface:
//! - [`validate`] / [`validate_with`] and [`Credentials`] for input rules.
//! - [`encode`] and [`RequestPayload`] for the wire body.
//! - [`User`] for the authenticated identity.
//! - [`LoginOrchestrator`] and [`LoginFormHandle`] for the reactive core.
//! - [`render`] for presentation directives.

pub mod credentials;
pub mod login_orchestrator;
pub mod payload;
pub mod ports;
pub mod presentation;
pub mod submission;
pub mod user;

pub use self::credentials::{
    Credentials, ValidCredentials, ValidationError, ValidationOutcome, ValidationPolicy, validate,
    validate_with,
};
pub use self::login_orchestrator::{
    LoginEvent, LoginFormHandle, LoginOrchestrator, OrchestratorConfig, OrchestratorError,
};
pub use self::payload::{EncodingError, RequestPayload, encode};
pub use self::presentation::{ButtonDirective, ButtonTone, Notice, RenderDirective, render};
pub use self::submission::{LoginFailure, StateUpdate, SubmissionState};
pub use self::user::{ResponseMapping, User, UserDecodeError};
