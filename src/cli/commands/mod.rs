pub mod backend;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const CMD_LOGIN: &str = "login";
pub const CMD_SIGNUP: &str = "signup";

pub const ARG_NAME: &str = "name";
pub const ARG_EMAIL: &str = "email";
pub const ARG_MOBILE: &str = "mobile";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long(ARG_EMAIL)
        .help("Account email address")
}

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long(ARG_PASSWORD)
        .help("Account password")
        .env("SIGNON_PASSWORD")
        .hide_env_values(true)
}

// Empty fields are accepted here; the flows report them the same way the
// screens do.
fn login() -> Command {
    Command::new(CMD_LOGIN)
        .about("Sign in with an existing account")
        .arg(email_arg())
        .arg(password_arg())
}

fn signup() -> Command {
    Command::new(CMD_SIGNUP)
        .about("Create an account and store its profile")
        .arg(
            Arg::new(ARG_NAME)
                .short('n')
                .long(ARG_NAME)
                .help("Display name"),
        )
        .arg(email_arg())
        .arg(
            Arg::new(ARG_MOBILE)
                .short('m')
                .long(ARG_MOBILE)
                .help("Mobile number (optional)"),
        )
        .arg(password_arg())
        .arg(
            Arg::new(ARG_CONFIRM_PASSWORD)
                .short('c')
                .long(ARG_CONFIRM_PASSWORD)
                .help("Password confirmation")
                .env("SIGNON_CONFIRM_PASSWORD")
                .hide_env_values(true),
        )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("signon")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(login())
        .subcommand(signup());

    let command = backend::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "signon");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some(env!("CARGO_PKG_DESCRIPTION").to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
        command.debug_assert();
    }

    #[test]
    fn test_login_args() {
        temp_env::with_vars(
            [
                ("SIGNON_PASSWORD", None::<&str>),
                ("SIGNON_IDENTITY_URL", None::<&str>),
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "signon",
                    "--identity-url",
                    "https://id.example.com",
                    "login",
                    "--email",
                    "jo@x.com",
                    "--password",
                    "secret1",
                ]);

                assert_eq!(
                    matches
                        .get_one::<String>(backend::ARG_IDENTITY_URL)
                        .cloned(),
                    Some("https://id.example.com".to_string())
                );
                let (name, sub) = matches.subcommand().expect("subcommand");
                assert_eq!(name, CMD_LOGIN);
                assert_eq!(
                    sub.get_one::<String>(ARG_EMAIL).cloned(),
                    Some("jo@x.com".to_string())
                );
                assert_eq!(
                    sub.get_one::<String>(ARG_PASSWORD).cloned(),
                    Some("secret1".to_string())
                );
            },
        );
    }

    #[test]
    fn test_login_fields_are_optional() {
        temp_env::with_vars([("SIGNON_PASSWORD", None::<&str>)], || {
            let matches = new().get_matches_from(vec!["signon", "login"]);
            let sub = matches.subcommand_matches(CMD_LOGIN).expect("login");
            assert!(sub.get_one::<String>(ARG_EMAIL).is_none());
            assert!(sub.get_one::<String>(ARG_PASSWORD).is_none());
        });
    }

    #[test]
    fn test_signup_args() {
        temp_env::with_vars(
            [
                ("SIGNON_PASSWORD", None::<&str>),
                ("SIGNON_CONFIRM_PASSWORD", None::<&str>),
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "signon",
                    "signup",
                    "--name",
                    "Jo",
                    "--email",
                    "Jo@X.com",
                    "--mobile",
                    "555",
                    "--password",
                    "secret1",
                    "--confirm-password",
                    "secret1",
                ]);
                let sub = matches.subcommand_matches(CMD_SIGNUP).expect("signup");
                assert_eq!(sub.get_one::<String>(ARG_NAME).cloned(), Some("Jo".into()));
                assert_eq!(
                    sub.get_one::<String>(ARG_EMAIL).cloned(),
                    Some("Jo@X.com".into())
                );
                assert_eq!(sub.get_one::<String>(ARG_MOBILE).cloned(), Some("555".into()));
                assert_eq!(
                    sub.get_one::<String>(ARG_CONFIRM_PASSWORD).cloned(),
                    Some("secret1".into())
                );
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("SIGNON_IDENTITY_URL", Some("https://id.example.com")),
                ("SIGNON_PROFILE_URL", Some("https://profiles.example.com")),
                ("SIGNON_API_KEY", Some("key")),
                ("SIGNON_PASSWORD", Some("secret1")),
                ("SIGNON_CONFIRM_PASSWORD", Some("secret2")),
                ("SIGNON_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["signon", "signup"]);
                assert_eq!(
                    matches
                        .get_one::<String>(backend::ARG_PROFILE_URL)
                        .cloned(),
                    Some("https://profiles.example.com".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(backend::ARG_API_KEY).cloned(),
                    Some("key".to_string())
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
                let sub = matches.subcommand_matches(CMD_SIGNUP).expect("signup");
                assert_eq!(
                    sub.get_one::<String>(ARG_PASSWORD).cloned(),
                    Some("secret1".to_string())
                );
                assert_eq!(
                    sub.get_one::<String>(ARG_CONFIRM_PASSWORD).cloned(),
                    Some("secret2".to_string())
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("SIGNON_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["signon", "login"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_usize {
            temp_env::with_vars([("SIGNON_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["signon".to_string(), "login".to_string()];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_invalid_log_level() {
        temp_env::with_vars([("SIGNON_LOG_LEVEL", Some("loud"))], || {
            let result = new().try_get_matches_from(vec!["signon", "login"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_subcommand_required() {
        let result = new().try_get_matches_from(vec!["signon"]);
        assert!(result.is_err());
    }
}
