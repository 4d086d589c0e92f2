//! `-v` verbosity. Each repetition raises the level one step from the
//! default of `error`; `GATEHOUSE_LOG_LEVEL` takes either a level name or
//! the same step count.

use clap::{builder::ValueParser, Arg, ArgAction, Command};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ENV_LOG_LEVEL: &str = "GATEHOUSE_LOG_LEVEL";

/// Level names in step order; `-v` once is `warn`.
const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Turn a level name or step count into a step count.
fn parse_level(value: &str) -> Result<u8, String> {
    let value = value.trim();

    if let Ok(steps) = value.parse::<u8>() {
        if usize::from(steps) < LEVELS.len() {
            return Ok(steps);
        }
        return Err(format!("log level must be 0-{}", LEVELS.len() - 1));
    }

    LEVELS
        .iter()
        .position(|name| name.eq_ignore_ascii_case(value))
        .and_then(|steps| u8::try_from(steps).ok())
        .ok_or_else(|| format!("unknown log level {value:?}, expected one of {LEVELS:?}"))
}

#[must_use]
pub fn level_parser() -> ValueParser {
    ValueParser::from(parse_level)
}

/// Tracing level for a step count. `None` leaves the subscriber at its
/// `error` default.
#[must_use]
pub const fn level(steps: u8) -> Option<Level> {
    match steps {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Repeat to log more: -v warn, -vv info, -vvv debug, -vvvv trace")
            .long_help(
                "Repeat to log more: -v warn, -vv info, -vvv debug, -vvvv trace. \
                 Errors are always logged. RUST_LOG overrides this setting.",
            )
            .env(ENV_LOG_LEVEL)
            .global(true)
            .action(ArgAction::Count)
            .value_parser(level_parser()),
    )
}
