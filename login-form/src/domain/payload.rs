//! Request body encoding for login submissions.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use zeroize::Zeroizing;

/// Serialisation failed while building a request body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to encode login request: {message}")]
pub struct EncodingError {
    /// Description of the serialiser failure.
    pub message: String,
}

/// Opaque serialised login request body.
///
/// The bytes are wiped when the payload is dropped and never printed by
/// `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestPayload(Zeroizing<Vec<u8>>);

impl RequestPayload {
    /// Raw body bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Body length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for RequestPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestPayload")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct LoginRequestBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// Encode an email/password pair as a pretty-printed JSON object.
///
/// Call sites must only pass values that passed validation; the encoder
/// does not re-check them.
///
/// # Errors
///
/// Returns [`EncodingError`] when serialisation fails.
///
/// # Examples
/// ```
/// use login_form::domain::encode;
///
/// let payload = encode("ada@example.com", "pw").unwrap();
/// let decoded: serde_json::Value = serde_json::from_slice(payload.as_bytes()).unwrap();
/// assert_eq!(decoded["email"], "ada@example.com");
/// ```
pub fn encode(email: &str, password: &str) -> Result<RequestPayload, EncodingError> {
    serde_json::to_vec_pretty(&LoginRequestBody { email, password })
        .map(|bytes| RequestPayload(Zeroizing::new(bytes)))
        .map_err(|err| EncodingError {
            message: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::{Map, Value};

    fn decode(payload: &RequestPayload) -> Map<String, Value> {
        serde_json::from_slice(payload.as_bytes()).expect("payload is a JSON object")
    }

    #[rstest]
    #[case("ada@example.com", "pw")]
    #[case("quote\"d", "back\\slash")]
    #[case("ünïcødé", "パスワード")]
    fn decoding_reproduces_exactly_the_two_fields(#[case] email: &str, #[case] password: &str) {
        let payload = encode(email, password).expect("encode");
        let decoded = decode(&payload);

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.get("email").and_then(Value::as_str), Some(email));
        assert_eq!(decoded.get("password").and_then(Value::as_str), Some(password));
    }

    #[rstest]
    fn body_is_pretty_printed() {
        let payload = encode("ada@example.com", "pw").expect("encode");
        let body = String::from_utf8(payload.as_bytes().to_vec()).expect("utf-8 body");
        insta::assert_snapshot!(body, @r#"
        {
          "email": "ada@example.com",
          "password": "pw"
        }
        "#);
    }

    #[rstest]
    fn debug_output_hides_the_body() {
        let payload = encode("ada@example.com", "hunter2").expect("encode");
        let rendered = format!("{payload:?}");
        assert!(rendered.starts_with("RequestPayload"));
        assert!(!rendered.contains("hunter2"), "debug output leaked: {rendered}");
    }
}
