//! # Signon (client-side sign-in and sign-up)
//!
//! `signon` implements the flows behind a login screen and a signup screen
//! while leaving credential storage, authentication, and profile persistence to
//! external services.
//!
//! ## Flows
//!
//! - **Login:** both fields must be filled, then a single sign-in call is made
//!   and its outcome is reported.
//! - **Signup:** the form is validated locally (name, email shape, password
//!   length, confirmation), an account is created, and a profile record keyed by
//!   the lower-cased email is merge-written. The password is never part of the
//!   profile record.
//!
//! ## Backends
//!
//! The flows depend on two traits, [`backend::AuthSession`] and
//! [`backend::ProfileStore`], injected into the controllers at construction.
//! JSON/HTTP and in-memory implementations are provided.
//!
//! Failures never end the process: every error returns the controller to a
//! state where the user can submit again.

pub mod backend;
pub mod cli;
pub mod error;
pub mod flow;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
