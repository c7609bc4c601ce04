pub mod login;
pub mod signup;

// The match over actions lives in `run` so this module only declares them.
mod run;

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
    Signup(signup::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the flow does not end in success.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
