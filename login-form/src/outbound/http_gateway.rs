//! Reqwest-backed login gateway adapter.
//!
//! This adapter owns transport details only: URL parsing, the POST itself,
//! timeout and HTTP error mapping, and decoding the body into a JSON object.
//! Turning that object into a user is left to the domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url, header};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::ports::{GatewayError, LoginGateway};
use crate::domain::{RequestPayload, ResponseMapping};

/// Request timeout applied when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Login gateway that POSTs JSON bodies to one endpoint.
#[derive(Debug, Clone)]
pub struct HttpLoginGateway {
    client: Client,
    endpoint: String,
}

impl HttpLoginGateway {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// The endpoint is parsed on every call, so a malformed endpoint surfaces
    /// as [`GatewayError::InvalidUrl`] from [`LoginGateway::submit`].
    /// ```rust,ignore
    /// let gateway = HttpLoginGateway::new("http://127.0.0.1:8080/login", timeout)?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait]
impl LoginGateway for HttpLoginGateway {
    async fn submit(&self, payload: &RequestPayload) -> Result<ResponseMapping, GatewayError> {
        let url = Url::parse(&self.endpoint).map_err(|error| {
            warn!(endpoint = %self.endpoint, %error, "login endpoint rejected");
            GatewayError::invalid_url(error.to_string())
        })?;

        debug!(%url, body_len = payload.len(), "sending login request");
        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .body(payload.as_bytes().to_vec())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let error = map_status_error(status, body.as_ref());
            warn!(status = status.as_u16(), %error, "login request rejected");
            return Err(error);
        }

        debug!(status = status.as_u16(), body_len = body.len(), "login response received");
        parse_mapping(body.as_ref())
    }
}

fn parse_mapping(body: &[u8]) -> Result<ResponseMapping, GatewayError> {
    if body.is_empty() {
        return Err(GatewayError::unknown());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(mapping)) => Ok(mapping),
        Ok(other) => Err(GatewayError::invalid_response(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
        Err(error) => Err(GatewayError::invalid_response(format!(
            "invalid JSON payload: {error}"
        ))),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    let message = error.to_string();
    if error.is_timeout() {
        warn!(%message, "login request timed out");
        GatewayError::timeout(message)
    } else {
        warn!(%message, "login transport failed");
        GatewayError::transport(message)
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GatewayError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::timeout(message),
        _ => GatewayError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHARS: usize = 160;

    let text = String::from_utf8_lossy(body);
    let mut words = text.split_whitespace();
    let mut preview = words.next().map(str::to_owned).unwrap_or_default();
    for word in words {
        preview.push(' ');
        preview.push_str(word);
    }
    if let Some((cut, _)) = preview.char_indices().nth(PREVIEW_CHARS) {
        preview.truncate(cut);
        preview.push_str("...");
    }
    preview
}
