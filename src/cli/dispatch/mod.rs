//! Maps parsed arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{backend, session, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or malformed.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let backend_opts = backend::Options::parse(matches)?;
    let session_opts = session::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        api_base_url: backend_opts.api_base_url,
        production: backend_opts.production,
        session_secrets: session_opts.secrets,
        session_cookie_name: session_opts.cookie_name,
        session_max_age_seconds: session_opts.max_age_seconds,
        session_encrypt: session_opts.encrypt,
    }))
}
