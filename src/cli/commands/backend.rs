use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use url::Url;

pub const ARG_API_BASE_URL: &str = "api-base-url";
pub const ARG_ENVIRONMENT: &str = "environment";

const PRODUCTION: &str = "production";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_BASE_URL)
                .long(ARG_API_BASE_URL)
                .help("Base URL of the authentication API")
                .env("GATEHOUSE_API_BASE_URL")
                .default_value("http://localhost:8000"),
        )
        .arg(
            Arg::new(ARG_ENVIRONMENT)
                .long(ARG_ENVIRONMENT)
                .help("Deployment environment, production marks the session cookie Secure")
                .env("GATEHOUSE_ENV")
                .default_value("development")
                .value_parser(["development", "production", "test"]),
        )
}

#[derive(Debug)]
pub struct Options {
    pub api_base_url: Url,
    pub production: bool,
}

impl Options {
    /// # Errors
    /// Returns an error if the API base URL is missing or malformed.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let api_base_url = matches
            .get_one::<String>(ARG_API_BASE_URL)
            .context("missing required argument: --api-base-url")?;
        let api_base_url = Url::parse(api_base_url)
            .with_context(|| format!("invalid --api-base-url: {api_base_url}"))?;

        let production = matches
            .get_one::<String>(ARG_ENVIRONMENT)
            .is_some_and(|env| env == PRODUCTION);

        Ok(Self {
            api_base_url,
            production,
        })
    }
}
