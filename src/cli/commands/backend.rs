use clap::{Arg, Command};

pub const ARG_IDENTITY_URL: &str = "identity-url";
pub const ARG_PROFILE_URL: &str = "profile-url";
pub const ARG_API_KEY: &str = "api-key";

// Not marked `required`: clap rejects global args that are required on the
// root command, so dispatch reports the missing URL instead.
#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_IDENTITY_URL)
                .long(ARG_IDENTITY_URL)
                .help("Identity provider base URL, example: https://id.example.com")
                .env("SIGNON_IDENTITY_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_PROFILE_URL)
                .long(ARG_PROFILE_URL)
                .help("Profile store base URL (default: the identity URL)")
                .env("SIGNON_PROFILE_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_API_KEY)
                .long(ARG_API_KEY)
                .help("API key sent as X-Api-Key to both services")
                .env("SIGNON_API_KEY")
                .hide_env_values(true)
                .global(true),
        )
}
