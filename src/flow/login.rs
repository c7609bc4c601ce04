//! Email/password sign-in.
//!
//! Flow Overview: check both fields are filled, call the identity provider
//! once, then report success or the provider's message verbatim.

use crate::{
    backend::AuthSession,
    error::AuthError,
    flow::{Credentials, Notice, Session},
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

const MISSING_CREDENTIALS: &str = "Enter email & password";
const SIGNED_IN: &str = "Signed in";

#[derive(Debug, Clone)]
pub enum LoginState {
    Idle,
    Submitting,
    Success(Session),
    Failed(AuthError),
}

impl LoginState {
    /// Whether the submit control is enabled in this state.
    #[must_use]
    pub const fn accepts_submit(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed(_))
    }
}

enum Gate {
    Busy,
    Incomplete,
    Accepted,
}

/// Drives the login screen. Share it behind an `Arc` if several tasks submit;
/// only one sign-in is ever in flight per controller.
pub struct LoginController {
    auth: Arc<dyn AuthSession>,
    state: watch::Sender<LoginState>,
}

impl LoginController {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthSession>) -> Self {
        let (state, _) = watch::channel(LoginState::Idle);
        Self { auth, state }
    }

    #[must_use]
    pub fn state(&self) -> LoginState {
        self.state.borrow().clone()
    }

    /// Follow state transitions, e.g. to show a spinner while submitting.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoginState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn submit_enabled(&self) -> bool {
        self.state.borrow().accepts_submit()
    }

    /// Return to `Idle`, e.g. after a submission future was dropped mid-flight.
    pub fn reset(&self) {
        self.state.send_replace(LoginState::Idle);
    }

    /// Submit the login form. The email is trimmed; the password is sent as typed.
    #[instrument(skip_all)]
    pub async fn submit(&self, email: &str, password: SecretString) -> Notice {
        let email = email.trim();
        let complete = !email.is_empty() && !password.expose_secret().trim().is_empty();

        // Check and claim the controller in one step so concurrent submits
        // cannot both reach the provider.
        let mut gate = Gate::Busy;
        self.state.send_if_modified(|state| {
            if !state.accepts_submit() {
                return false;
            }
            if complete {
                *state = LoginState::Submitting;
                gate = Gate::Accepted;
            } else {
                *state = LoginState::Idle;
                gate = Gate::Incomplete;
            }
            true
        });

        match gate {
            Gate::Busy => {
                debug!("submit ignored, login not accepting input");
                return Notice::Ignored;
            }
            Gate::Incomplete => return Notice::Prompt(MISSING_CREDENTIALS.to_string()),
            Gate::Accepted => {}
        }

        let credentials = Credentials::new(email, password);
        let result = self.auth.sign_in(&credentials).await;
        drop(credentials);

        match result {
            Ok(session) => {
                info!(account_id = %session.account_id, "signed in");
                self.state.send_replace(LoginState::Success(session));
                Notice::Confirmed(SIGNED_IN.to_string())
            }
            Err(err) => {
                warn!("sign-in failed: {}", err);
                let notice = Notice::Failed(err.message.clone());
                self.state.send_replace(LoginState::Failed(err));
                notice
            }
        }
    }
}
