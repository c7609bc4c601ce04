//! Registration form validation. Pure and deterministic: the first failing
//! rule wins and nothing outside the returned value changes.

use crate::{error::ValidationError, flow::RegistrationForm};
use regex::Regex;
use secrecy::ExposeSecret;

/// Minimum password length enforced before an account is requested.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Platform email grammar: local part, `@`, then at least two dot-separated labels.
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Mobile,
    Password,
    ConfirmPassword,
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Mobile => "mobile",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    Required,
    Malformed,
    TooShort,
    Mismatch,
}

impl Reason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Malformed => "malformed",
            Self::TooShort => "too short",
            Self::Mismatch => "mismatch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid { field: Field, reason: Reason },
}

impl ValidationResult {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Converts into a `Result` so callers can use `?`.
    ///
    /// # Errors
    /// Returns the failing field and reason when the form is invalid.
    pub const fn into_result(self) -> Result<(), ValidationError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid { field, reason } => Err(ValidationError { field, reason }),
        }
    }
}

/// Basic email format check.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(EMAIL_PATTERN).is_ok_and(|regex| regex.is_match(email))
}

/// Checks a registration form in a fixed order: name, email presence, email
/// shape, password length, password confirmation.
#[must_use]
pub fn validate(form: &RegistrationForm) -> ValidationResult {
    let invalid = |field, reason| ValidationResult::Invalid { field, reason };

    if form.name.is_empty() {
        return invalid(Field::Name, Reason::Required);
    }
    if form.email.is_empty() {
        return invalid(Field::Email, Reason::Required);
    }
    if !valid_email(&form.email) {
        return invalid(Field::Email, Reason::Malformed);
    }
    if form.password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return invalid(Field::Password, Reason::TooShort);
    }
    if !form.passwords_match() {
        return invalid(Field::ConfirmPassword, Reason::Mismatch);
    }

    ValidationResult::Valid
}
