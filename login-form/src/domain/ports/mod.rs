//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod login_gateway;

#[cfg(test)]
pub use login_gateway::MockLoginGateway;
pub use login_gateway::{FixtureLoginGateway, GatewayError, LoginGateway};
