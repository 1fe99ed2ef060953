//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators between domain types and transport
//! representations. They contain no business logic.

mod http_gateway;

pub use http_gateway::{DEFAULT_REQUEST_TIMEOUT, HttpLoginGateway};
