//! Error taxonomy for the sign-in and sign-up flows.
//!
//! Validation errors are local and never reach a backend. Identity and profile
//! errors carry the backend's reason so it can be shown to the user verbatim.

use crate::flow::{Account, Field, Reason};
use thiserror::Error;

/// A registration form field failed local validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", self.message())]
pub struct ValidationError {
    pub field: Field,
    pub reason: Reason,
}

impl ValidationError {
    /// User-facing text shown next to the offending field.
    #[must_use]
    pub fn message(&self) -> String {
        match (self.field, self.reason) {
            (Field::Name, Reason::Required) => "Name required".to_string(),
            (Field::Email, Reason::Required) => "Email required".to_string(),
            (Field::Email, Reason::Malformed) => "Enter a valid email".to_string(),
            (Field::Password, Reason::TooShort) => format!(
                "Password must be at least {} characters",
                crate::flow::MIN_PASSWORD_LENGTH
            ),
            (Field::ConfirmPassword, Reason::Mismatch) => "Passwords do not match".to_string(),
            (field, reason) => format!("{}: {}", field.as_str(), reason.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    DuplicateAccount,
    InvalidCredentials,
    WeakPassword,
    Unavailable,
    Rejected,
}

/// Failure reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub message: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn duplicate_account(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::DuplicateAccount, message)
    }

    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::InvalidCredentials, message)
    }

    pub fn weak_password(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::WeakPassword, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Unavailable, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Rejected, message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    Unavailable,
    Rejected,
}

/// Failure reported by the profile store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StorageError {
    pub kind: StorageErrorKind,
    pub message: String,
}

impl StorageError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: StorageErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: StorageErrorKind::Rejected,
            message: message.into(),
        }
    }
}

/// Why a signup submission ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignupFailure {
    #[error("Auth error: {0}")]
    Account(AuthError),
    /// The account was created but its profile could not be written.
    #[error("Profile error: {error}")]
    Profile { account: Account, error: StorageError },
}

impl SignupFailure {
    /// True when the identity provider already holds an account for this submission.
    #[must_use]
    pub const fn account_created(&self) -> bool {
        matches!(self, Self::Profile { .. })
    }
}
