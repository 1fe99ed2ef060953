//! Latest field values and the validity derivation.
//!
//! Both fields start out reported as empty, the way a UI draws a blank form.
//! That seeded pair is the first combination and is never published; every
//! edit after it yields a validity value, including the first real one.

use crate::domain::{Credentials, ValidCredentials, ValidationError, ValidationPolicy};

/// Current field values and the policy used to judge them.
#[derive(Debug)]
pub(super) struct FormState {
    credentials: Credentials,
    policy: ValidationPolicy,
}

impl FormState {
    pub(super) fn new(policy: ValidationPolicy) -> Self {
        Self {
            credentials: Credentials::new(Some(String::new()), Some(String::new())),
            policy,
        }
    }

    /// Record an email edit and return the validity to publish.
    pub(super) fn set_email(&mut self, email: Option<String>) -> bool {
        self.credentials.set_email(email);
        self.is_valid()
    }

    /// Record a password edit and return the validity to publish.
    pub(super) fn set_password(&mut self, password: Option<String>) -> bool {
        self.credentials.set_password(password);
        self.is_valid()
    }

    /// Copy of the current credentials, provided they validate.
    pub(super) fn snapshot(&self) -> Result<ValidCredentials, ValidationError> {
        self.credentials.validated(self.policy)
    }

    fn is_valid(&self) -> bool {
        self.credentials.outcome(self.policy).is_valid()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn form() -> FormState {
        FormState::new(ValidationPolicy::Collapsed)
    }

    #[rstest]
    fn seeded_pair_is_empty_and_unsubmittable(form: FormState) {
        assert_eq!(form.snapshot(), Err(ValidationError::EmptyBoth));
    }

    #[rstest]
    fn the_first_real_edit_is_reported(mut form: FormState) {
        assert!(!form.set_email(Some("ada@example.com".into())));
        assert!(form.set_password(Some("pw".into())));
        assert!(form.snapshot().is_ok());
    }

    #[rstest]
    fn duplicate_validity_values_are_still_reported(mut form: FormState) {
        assert!(!form.set_password(Some("p".into())));
        assert!(!form.set_password(Some("pw".into())));
    }

    #[rstest]
    fn snapshot_reports_the_current_reason(mut form: FormState) {
        form.set_email(None);
        form.set_password(None);
        assert_eq!(form.snapshot(), Err(ValidationError::MissingBoth));
        form.set_password(Some("pw".into()));
        assert_eq!(form.snapshot(), Err(ValidationError::MissingPassword));
    }

    #[rstest]
    fn per_field_policy_names_the_empty_field() {
        let mut form = FormState::new(ValidationPolicy::PerField);
        form.set_email(Some("ada@example.com".into()));
        assert_eq!(form.snapshot(), Err(ValidationError::EmptyPassword));
    }
}
