use crate::{
    backend::{identity::HttpIdentity, profiles::HttpProfileStore},
    cli::globals::GlobalArgs,
    error::{AuthErrorKind, SignupFailure},
    flow::{RegistrationForm, Screen, SignupController, SignupState},
};
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub form: RegistrationForm,
}

/// Execute the signup action.
/// # Errors
/// Returns an error if a backend URL is invalid or registration does not succeed.
pub async fn execute(args: Args) -> Result<()> {
    let identity = HttpIdentity::new(&args.globals.identity_url, args.globals.api_key.clone())
        .context("invalid identity URL")?;
    let profiles = HttpProfileStore::new(&args.globals.profile_url, args.globals.api_key.clone())
        .context("invalid profile URL")?;

    let controller = SignupController::new(Arc::new(identity), Arc::new(profiles));
    let notice = controller.submit(&args.form).await;
    let message = notice.message().unwrap_or_default().to_string();

    match controller.state() {
        SignupState::Success(account) => {
            info!(account_id = %account.account_id, "signup finished");
            println!("{message}");
            Ok(())
        }
        SignupState::Failed(SignupFailure::Profile { account, .. }) => {
            warn!(account_id = %account.account_id, "account exists without a profile");
            Err(anyhow!(message))
        }
        SignupState::Failed(SignupFailure::Account(err))
            if err.kind == AuthErrorKind::DuplicateAccount =>
        {
            Err(anyhow!(
                "{message} (already registered? run `signon {}`)",
                Screen::Signup.navigate().as_str()
            ))
        }
        _ => Err(anyhow!(message)),
    }
}
