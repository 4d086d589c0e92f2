use crate::cli::{actions::Action, commands, commands::logging, dispatch, telemetry};
use anyhow::Result;

/// Parse the command line, initialize telemetry and return the action to run.
///
/// # Errors
///
/// Returns an error if telemetry initialization or action dispatch fails
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    let steps = matches
        .get_one::<u8>(logging::ARG_VERBOSITY)
        .copied()
        .unwrap_or(0);

    telemetry::init(logging::level(steps))?;

    dispatch::handler(&matches)
}
