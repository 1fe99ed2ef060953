//! Authenticated user returned by a successful login.

use serde_json::{Map, Value};
use thiserror::Error;

/// JSON object returned by the gateway on success.
pub type ResponseMapping = Map<String, Value>;

/// Why a success payload could not be turned into a [`User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UserDecodeError {
    /// `id` is absent or not a string.
    #[error("response is missing a string `id`")]
    MissingId,
    /// `name` is absent or not a string.
    #[error("response is missing a string `name`")]
    MissingName,
}

/// User identity reported by the login endpoint.
///
/// # Examples
/// ```
/// use login_form::domain::User;
/// use serde_json::json;
///
/// let mapping = json!({"id": "123", "name": "TestName"});
/// let user = User::from_mapping(mapping.as_object().unwrap()).unwrap();
/// assert_eq!(user.name(), "TestName");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    id: String,
    name: String,
}

impl User {
    /// Construct a user from its two fields.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Decode a user from a gateway success mapping.
    ///
    /// Keys other than `id` and `name` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`UserDecodeError`] when either field is absent or not a string.
    pub fn from_mapping(mapping: &ResponseMapping) -> Result<Self, UserDecodeError> {
        let id = mapping
            .get("id")
            .and_then(Value::as_str)
            .ok_or(UserDecodeError::MissingId)?;
        let name = mapping
            .get("name")
            .and_then(Value::as_str)
            .ok_or(UserDecodeError::MissingName)?;
        Ok(Self::new(id, name))
    }

    /// Stable user identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}
