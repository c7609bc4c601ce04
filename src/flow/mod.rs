//! Sign-in and sign-up flows.
//!
//! Each flow is a small state machine driven by a controller. Controllers own
//! their backend handles (injected at construction) and publish state through a
//! `watch` channel so a UI can follow transitions while a submission is in
//! flight. Feedback for the user comes back from `submit` as a [`Notice`].

pub mod login;
pub mod signup;
pub mod types;
pub mod validator;

pub use self::login::{LoginController, LoginState};
pub use self::signup::{SignupController, SignupState};
pub use self::types::{
    normalize_email, Account, Credentials, ProfileRecord, RegistrationForm, Session,
};
pub use self::validator::{
    valid_email, validate, Field, Reason, ValidationResult, MIN_PASSWORD_LENGTH,
};

/// The two entry points of the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Signup,
}

impl Screen {
    /// Follows the link shown on each screen ("sign up" / "log in").
    #[must_use]
    pub const fn navigate(self) -> Self {
        match self {
            Self::Login => Self::Signup,
            Self::Signup => Self::Login,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
        }
    }
}

/// User-facing feedback produced by a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Local prompt, no backend call was made.
    Prompt(String),
    /// A form field needs attention.
    FieldError { field: Field, message: String },
    Confirmed(String),
    Failed(String),
    /// Submit is disabled in the current state.
    Ignored,
}

impl Notice {
    /// Text to show, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Prompt(message)
            | Self::FieldError { message, .. }
            | Self::Confirmed(message)
            | Self::Failed(message) => Some(message),
            Self::Ignored => None,
        }
    }

    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }
}
