//! Driven port for submitting an encoded login request.
//!
//! The gateway owns transport concerns only. It resolves exactly once per
//! call, with either the decoded JSON object or a [`GatewayError`]; turning
//! the object into a [`crate::domain::User`] stays in the domain.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::{RequestPayload, ResponseMapping};

define_port_error! {
    /// Errors surfaced by a login gateway.
    pub enum GatewayError {
        /// The endpoint answered without usable data.
        Unknown =>
            "login gateway returned no data",
        /// The configured endpoint is not a valid URL.
        InvalidUrl {
            /// Parser detail.
            message: String,
        } =>
            "login endpoint is not a valid URL: {message}",
        /// The response body was not a JSON object.
        InvalidResponse {
            /// What was wrong with the body.
            message: String,
        } =>
            "login response was not a JSON object: {message}",
        /// The transport failed before a usable response arrived.
        Transport {
            /// Transport or status detail.
            message: String,
        } =>
            "login transport failed: {message}",
        /// The request exceeded the transport timeout.
        Timeout {
            /// Timeout detail.
            message: String,
        } =>
            "login request timed out: {message}",
    }
}

/// Port for sending a login request to the remote service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginGateway: Send + Sync {
    /// Submit an encoded request body.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use login_form::domain::encode;
    /// use login_form::domain::ports::{FixtureLoginGateway, LoginGateway};
    ///
    /// let payload = encode("ada@example.com", "pw")?;
    /// let mapping = FixtureLoginGateway.submit(&payload).await?;
    /// assert_eq!(mapping["id"], "123");
    /// ```
    async fn submit(&self, payload: &RequestPayload) -> Result<ResponseMapping, GatewayError>;
}

/// Fixture gateway that accepts every request as the same test user.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginGateway;

impl FixtureLoginGateway {
    /// Identifier returned for every request.
    pub const USER_ID: &'static str = "123";
    /// Display name returned for every request.
    pub const USER_NAME: &'static str = "TestName";
}

#[async_trait]
impl LoginGateway for FixtureLoginGateway {
    async fn submit(&self, _payload: &RequestPayload) -> Result<ResponseMapping, GatewayError> {
        let mut mapping = ResponseMapping::new();
        mapping.insert("id".to_owned(), Value::from(Self::USER_ID));
        mapping.insert("name".to_owned(), Value::from(Self::USER_NAME));
        Ok(mapping)
    }
}
