use anyhow::{Context, Result};
use clap::{builder::BoolishValueParser, Arg, ArgAction, ArgMatches, Command};
use secrecy::SecretString;

use crate::session::{DEFAULT_COOKIE_NAME, DEFAULT_MAX_AGE_SECONDS};

pub const ARG_SESSION_SECRET: &str = "session-secret";
pub const ARG_SESSION_COOKIE_NAME: &str = "session-cookie-name";
pub const ARG_SESSION_MAX_AGE_SECONDS: &str = "session-max-age-seconds";
pub const ARG_SESSION_ENCRYPT: &str = "session-encrypt";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SESSION_SECRET)
                .long(ARG_SESSION_SECRET)
                .help("Cookie signing secret, repeat or comma separate to rotate (first one signs)")
                .env("GATEHOUSE_SESSION_SECRETS")
                .hide_env_values(true)
                .action(ArgAction::Append)
                .value_delimiter(',')
                .required(true),
        )
        .arg(
            Arg::new(ARG_SESSION_COOKIE_NAME)
                .long(ARG_SESSION_COOKIE_NAME)
                .help("Session cookie name")
                .env("GATEHOUSE_SESSION_COOKIE_NAME")
                .default_value(DEFAULT_COOKIE_NAME),
        )
        .arg(
            Arg::new(ARG_SESSION_MAX_AGE_SECONDS)
                .long(ARG_SESSION_MAX_AGE_SECONDS)
                .help("Session lifetime in seconds")
                .env("GATEHOUSE_SESSION_MAX_AGE_SECONDS")
                .default_value("604800")
                .value_parser(clap::value_parser!(i64).range(1..)),
        )
        .arg(
            Arg::new(ARG_SESSION_ENCRYPT)
                .long(ARG_SESSION_ENCRYPT)
                .help("Encrypt the session cookie instead of only signing it")
                .env("GATEHOUSE_SESSION_ENCRYPT")
                .action(ArgAction::SetTrue)
                .value_parser(BoolishValueParser::new()),
        )
}

#[derive(Debug)]
pub struct Options {
    pub secrets: Vec<SecretString>,
    pub cookie_name: String,
    pub max_age_seconds: i64,
    pub encrypt: bool,
}

impl Options {
    /// # Errors
    /// Returns an error if no session secret was given.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let secrets: Vec<SecretString> = matches
            .get_many::<String>(ARG_SESSION_SECRET)
            .context("missing required argument: --session-secret")?
            .map(|secret| SecretString::from(secret.clone()))
            .collect();

        let cookie_name = matches
            .get_one::<String>(ARG_SESSION_COOKIE_NAME)
            .cloned()
            .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string());

        let max_age_seconds = matches
            .get_one::<i64>(ARG_SESSION_MAX_AGE_SECONDS)
            .copied()
            .unwrap_or(DEFAULT_MAX_AGE_SECONDS);

        Ok(Self {
            secrets,
            cookie_name,
            max_age_seconds,
            encrypt: matches.get_flag(ARG_SESSION_ENCRYPT),
        })
    }
}
