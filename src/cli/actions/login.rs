use crate::{
    backend::identity::HttpIdentity,
    cli::globals::GlobalArgs,
    error::AuthErrorKind,
    flow::{LoginController, LoginState, Screen},
};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub email: String,
    pub password: SecretString,
}

/// Execute the login action.
/// # Errors
/// Returns an error if the identity URL is invalid or sign-in does not succeed.
pub async fn execute(args: Args) -> Result<()> {
    let identity = HttpIdentity::new(&args.globals.identity_url, args.globals.api_key.clone())
        .context("invalid identity URL")?;

    let controller = LoginController::new(Arc::new(identity));
    let notice = controller.submit(&args.email, args.password).await;
    let message = notice.message().unwrap_or_default().to_string();

    match controller.state() {
        LoginState::Success(session) => {
            info!(account_id = %session.account_id, "login finished");
            println!("{message}");
            Ok(())
        }
        LoginState::Failed(err) if err.kind == AuthErrorKind::InvalidCredentials => Err(anyhow!(
            "{message} (no account yet? run `signon {}`)",
            Screen::Login.navigate().as_str()
        )),
        _ => Err(anyhow!(message)),
    }
}
