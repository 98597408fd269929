use clap::{Arg, Command};

pub const ARG_SESSION_SECRET: &str = "session-secret";
pub const ARG_BASE_URL: &str = "base-url";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SESSION_SECRET)
                .long("session-secret")
                .help("Secret used to sign session cookies (at least 32 characters)")
                .env("ENSALUTI_SESSION_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_BASE_URL)
                .long("base-url")
                .help("Public base URL of the service; https enables the Secure cookie attribute")
                .env("ENSALUTI_BASE_URL")
                .default_value("http://localhost:8080"),
        )
}
