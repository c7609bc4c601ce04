//! Account registration.
//!
//! Flow Overview: trim and validate the form locally, create the account with
//! the identity provider, then merge-write the profile keyed by the lower-cased
//! email. Submit stays disabled from account creation until the sequence ends.
//! If the profile write fails the account is left in place and the user may
//! submit again.

use crate::{
    backend::{AuthSession, ProfileStore, WriteMode},
    error::SignupFailure,
    flow::{validate, Account, Notice, ProfileRecord, RegistrationForm},
};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

const USER_SAVED: &str = "User saved";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupState {
    Idle,
    Validating,
    CreatingAccount,
    SavingProfile,
    Success(Account),
    Failed(SignupFailure),
}

impl SignupState {
    /// Whether the submit control is enabled in this state.
    #[must_use]
    pub const fn accepts_submit(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed(_))
    }
}

/// Drives the signup screen.
pub struct SignupController {
    auth: Arc<dyn AuthSession>,
    profiles: Arc<dyn ProfileStore>,
    state: watch::Sender<SignupState>,
}

impl SignupController {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthSession>, profiles: Arc<dyn ProfileStore>) -> Self {
        let (state, _) = watch::channel(SignupState::Idle);
        Self {
            auth,
            profiles,
            state,
        }
    }

    #[must_use]
    pub fn state(&self) -> SignupState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SignupState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn submit_enabled(&self) -> bool {
        self.state.borrow().accepts_submit()
    }

    /// Return to `Idle`, e.g. after a submission future was dropped mid-flight.
    pub fn reset(&self) {
        self.state.send_replace(SignupState::Idle);
    }

    #[instrument(skip_all)]
    pub async fn submit(&self, form: &RegistrationForm) -> Notice {
        let claimed = self.state.send_if_modified(|state| {
            if !state.accepts_submit() {
                return false;
            }
            *state = SignupState::Validating;
            true
        });

        if !claimed {
            debug!("submit ignored, signup in progress or finished");
            return Notice::Ignored;
        }

        let form = form.trimmed();

        if let Err(err) = validate(&form).into_result() {
            debug!(
                field = err.field.as_str(),
                reason = err.reason.as_str(),
                "form invalid"
            );
            self.state.send_replace(SignupState::Idle);

            return Notice::FieldError {
                field: err.field,
                message: err.message(),
            };
        }

        self.state.send_replace(SignupState::CreatingAccount);

        let account = match self.auth.create_account(&form.credentials()).await {
            Ok(account) => account,
            Err(err) => return self.fail(SignupFailure::Account(err)),
        };

        info!(account_id = %account.account_id, "account created");
        self.state.send_replace(SignupState::SavingProfile);

        let record = ProfileRecord::from_form(&form, Utc::now().timestamp_millis());
        drop(form);

        match self
            .profiles
            .save_profile(record.key(), &record, WriteMode::Merge)
            .await
        {
            Ok(()) => {
                info!(account_id = %account.account_id, "profile saved");
                self.state.send_replace(SignupState::Success(account));
                Notice::Confirmed(USER_SAVED.to_string())
            }
            Err(error) => self.fail(SignupFailure::Profile { account, error }),
        }
    }

    fn fail(&self, failure: SignupFailure) -> Notice {
        warn!(account_created = failure.account_created(), "signup failed: {}", failure);
        let notice = Notice::Failed(failure.to_string());
        self.state.send_replace(SignupState::Failed(failure));
        notice
    }
}
