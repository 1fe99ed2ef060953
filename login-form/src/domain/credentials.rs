//! Credential validation for the login form.
//!
//! Both fields arrive as "possibly absent" text because the UI layer may not
//! have reported a value yet. Validation is total: every input pair maps to
//! exactly one [`ValidationOutcome`].

use std::fmt;

use thiserror::Error;
use zeroize::Zeroizing;

use super::payload::{EncodingError, RequestPayload, encode};

/// Reasons a credential pair is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ValidationError {
    /// The email field is missing.
    #[error("email is missing")]
    MissingEmail,
    /// The password field is missing.
    #[error("password is missing")]
    MissingPassword,
    /// Neither field has a value.
    #[error("email and password are missing")]
    MissingBoth,
    /// The email field is present but empty.
    #[error("email must not be empty")]
    EmptyEmail,
    /// The password field is present but empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// At least one present field is empty.
    #[error("email and password must not be empty")]
    EmptyBoth,
}

/// Classification of a credential pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationOutcome {
    /// Both fields are present and non-empty.
    Valid,
    /// The pair cannot be submitted.
    Invalid(ValidationError),
}

impl ValidationOutcome {
    /// Return `true` for [`ValidationOutcome::Valid`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// How emptiness is reported once both fields are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// Any empty field collapses to [`ValidationError::EmptyBoth`].
    #[default]
    Collapsed,
    /// Report [`ValidationError::EmptyEmail`] or
    /// [`ValidationError::EmptyPassword`] when only one field is empty.
    PerField,
}

/// Validate a credential pair with the default collapsed policy.
///
/// # Examples
/// ```
/// use login_form::domain::{ValidationError, ValidationOutcome, validate};
///
/// assert_eq!(validate(Some("a@b.c"), Some("pw")), ValidationOutcome::Valid);
/// assert_eq!(
///     validate(Some(""), Some("pw")),
///     ValidationOutcome::Invalid(ValidationError::EmptyBoth)
/// );
/// ```
#[must_use]
pub fn validate(email: Option<&str>, password: Option<&str>) -> ValidationOutcome {
    validate_with(ValidationPolicy::Collapsed, email, password)
}

/// Validate a credential pair under an explicit [`ValidationPolicy`].
///
/// Absence is checked before emptiness, and the absence reasons follow the
/// legacy naming: an absent email with a present password reports
/// [`ValidationError::MissingPassword`], and the reverse reports
/// [`ValidationError::MissingEmail`].
#[must_use]
pub fn validate_with(
    policy: ValidationPolicy,
    email: Option<&str>,
    password: Option<&str>,
) -> ValidationOutcome {
    let (email, password) = match (email, password) {
        (None, None) => return ValidationOutcome::Invalid(ValidationError::MissingBoth),
        (None, Some(_)) => return ValidationOutcome::Invalid(ValidationError::MissingPassword),
        (Some(_), None) => return ValidationOutcome::Invalid(ValidationError::MissingEmail),
        (Some(email), Some(password)) => (email, password),
    };

    match (email.is_empty(), password.is_empty(), policy) {
        (false, false, _) => ValidationOutcome::Valid,
        (true, true, _) | (_, _, ValidationPolicy::Collapsed) => {
            ValidationOutcome::Invalid(ValidationError::EmptyBoth)
        }
        (true, false, ValidationPolicy::PerField) => {
            ValidationOutcome::Invalid(ValidationError::EmptyEmail)
        }
        (false, true, ValidationPolicy::PerField) => {
            ValidationOutcome::Invalid(ValidationError::EmptyPassword)
        }
    }
}

/// The current, possibly incomplete, field values typed by the user.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    email: Option<String>,
    password: Option<Zeroizing<String>>,
}

impl Credentials {
    /// Build credentials from raw field values.
    #[must_use]
    pub fn new(email: Option<String>, password: Option<String>) -> Self {
        Self {
            email,
            password: password.map(Zeroizing::new),
        }
    }

    /// Current email value, if reported.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Current password value, if reported.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_ref().map(|password| password.as_str())
    }

    /// Replace the email value.
    pub fn set_email(&mut self, email: Option<String>) {
        self.email = email;
    }

    /// Replace the password value.
    pub fn set_password(&mut self, password: Option<String>) {
        self.password = password.map(Zeroizing::new);
    }

    /// Classify the current values.
    #[must_use]
    pub fn outcome(&self, policy: ValidationPolicy) -> ValidationOutcome {
        validate_with(policy, self.email(), self.password())
    }

    /// Snapshot the current values as submittable credentials.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] when the values are not valid.
    pub fn validated(&self, policy: ValidationPolicy) -> Result<ValidCredentials, ValidationError> {
        match (self.outcome(policy), self.email(), self.password()) {
            (ValidationOutcome::Valid, Some(email), Some(password)) => Ok(ValidCredentials {
                email: email.to_owned(),
                password: Zeroizing::new(password.to_owned()),
            }),
            (ValidationOutcome::Invalid(reason), _, _) => Err(reason),
            (ValidationOutcome::Valid, _, _) => Err(ValidationError::MissingBoth),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Credentials that passed validation.
///
/// ## Invariants
/// - `email` and `password` are present and non-empty.
/// - The value is an owned snapshot; later field edits do not reach it.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl ValidCredentials {
    /// Email to submit.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password to submit.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Encode the snapshot into a request body.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError`] when serialisation fails.
    pub fn encode(&self) -> Result<RequestPayload, EncodingError> {
        encode(self.email(), self.password())
    }
}

impl fmt::Debug for ValidCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
