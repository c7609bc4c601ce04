use crate::cli::{
    actions::{login, signup, Action},
    commands::{self, backend},
    globals::GlobalArgs,
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

// Missing text fields become empty strings; the flows decide what to say about them.
fn text(matches: &ArgMatches, id: &str) -> String {
    matches.get_one::<String>(id).cloned().unwrap_or_default()
}

fn secret(matches: &ArgMatches, id: &str) -> SecretString {
    SecretString::from(text(matches, id))
}

fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let identity_url = matches
        .get_one::<String>(backend::ARG_IDENTITY_URL)
        .cloned()
        .context("missing required argument: --identity-url")?;

    let mut globals = GlobalArgs::new(identity_url);

    if let Some(url) = matches.get_one::<String>(backend::ARG_PROFILE_URL) {
        globals.set_profile_url(url.clone());
    }

    if let Some(key) = matches.get_one::<String>(backend::ARG_API_KEY) {
        globals.set_api_key(SecretString::from(key.clone()));
    }

    Ok(globals)
}

/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;

    match matches.subcommand() {
        Some((commands::CMD_LOGIN, sub_m)) => Ok(Action::Login(login::Args {
            globals,
            email: text(sub_m, commands::ARG_EMAIL),
            password: secret(sub_m, commands::ARG_PASSWORD),
        })),
        Some((commands::CMD_SIGNUP, sub_m)) => Ok(Action::Signup(signup::Args {
            globals,
            form: crate::flow::RegistrationForm {
                name: text(sub_m, commands::ARG_NAME),
                email: text(sub_m, commands::ARG_EMAIL),
                mobile: text(sub_m, commands::ARG_MOBILE),
                password: secret(sub_m, commands::ARG_PASSWORD),
                confirm_password: secret(sub_m, commands::ARG_CONFIRM_PASSWORD),
            },
        })),
        Some((name, _)) => Err(anyhow!("unknown command: {name}")),
        None => Err(anyhow!("missing command: login or signup")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn clean_env() -> [(&'static str, Option<&'static str>); 5] {
        [
            ("SIGNON_IDENTITY_URL", None),
            ("SIGNON_PROFILE_URL", None),
            ("SIGNON_API_KEY", None),
            ("SIGNON_PASSWORD", None),
            ("SIGNON_CONFIRM_PASSWORD", None),
        ]
    }

    #[test]
    fn login_action() {
        temp_env::with_vars(clean_env(), || {
            let matches = commands::new().get_matches_from(vec![
                "signon",
                "--identity-url",
                "https://id.example.com",
                "login",
                "--email",
                "jo@x.com",
                "--password",
                "secret1",
            ]);

            let action = handler(&matches).expect("action");
            let Action::Login(args) = action else {
                panic!("expected login action");
            };
            assert_eq!(args.globals.identity_url, "https://id.example.com");
            assert_eq!(args.globals.profile_url, "https://id.example.com");
            assert!(args.globals.api_key.is_none());
            assert_eq!(args.email, "jo@x.com");
            assert_eq!(args.password.expose_secret(), "secret1");
        });
    }

    #[test]
    fn signup_action_reads_env() {
        temp_env::with_vars(
            [
                ("SIGNON_IDENTITY_URL", Some("https://id.example.com")),
                ("SIGNON_PROFILE_URL", Some("https://profiles.example.com")),
                ("SIGNON_API_KEY", Some("key")),
                ("SIGNON_PASSWORD", Some("secret1")),
                ("SIGNON_CONFIRM_PASSWORD", Some("secret1")),
            ],
            || {
                let matches = commands::new().get_matches_from(vec![
                    "signon", "signup", "--name", "Jo", "--email", "Jo@X.com",
                ]);

                let Action::Signup(args) = handler(&matches).expect("action") else {
                    panic!("expected signup action");
                };
                assert_eq!(args.globals.profile_url, "https://profiles.example.com");
                assert_eq!(
                    args.globals.api_key.as_ref().map(|k| k.expose_secret().to_string()),
                    Some("key".to_string())
                );
                assert_eq!(args.form.name, "Jo");
                assert_eq!(args.form.email, "Jo@X.com");
                assert_eq!(args.form.mobile, "");
                assert_eq!(args.form.password.expose_secret(), "secret1");
                assert_eq!(args.form.confirm_password.expose_secret(), "secret1");
            },
        );
    }

    #[test]
    fn identity_url_is_required() {
        temp_env::with_vars(clean_env(), || {
            let matches = commands::new().get_matches_from(vec!["signon", "login"]);
            let err = handler(&matches).expect_err("missing url");
            assert!(err.to_string().contains("--identity-url"));
        });
    }
}
