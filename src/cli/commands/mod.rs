pub mod backend;
pub mod logging;
pub mod session;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";

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

    let command = Command::new("gatehouse")
        .about("Session-backed login front end")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("GATEHOUSE_PORT")
                .value_parser(clap::value_parser!(u16)),
        );

    let command = backend::with_args(command);
    let command = session::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    const ENV: [&str; 9] = [
        "GATEHOUSE_PORT",
        "GATEHOUSE_API_BASE_URL",
        "GATEHOUSE_ENV",
        "GATEHOUSE_SESSION_SECRETS",
        "GATEHOUSE_SESSION_COOKIE_NAME",
        "GATEHOUSE_SESSION_MAX_AGE_SECONDS",
        "GATEHOUSE_SESSION_ENCRYPT",
        "GATEHOUSE_LOG_LEVEL",
        "RUST_LOG",
    ];

    fn clean_env() -> Vec<(&'static str, Option<&'static str>)> {
        env_with(&[])
    }

    // every known variable exactly once, unset unless overridden
    fn env_with(
        overrides: &[(&'static str, &'static str)],
    ) -> Vec<(&'static str, Option<&'static str>)> {
        ENV.iter()
            .map(|key| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| *value);
                (*key, value)
            })
            .collect()
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "gatehouse");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Session-backed login front end".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(clean_env(), || {
            let matches = new().get_matches_from(vec!["gatehouse", "--session-secret", "s3cr3t"]);

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8080));
            assert_eq!(
                matches.get_one::<String>(backend::ARG_API_BASE_URL).cloned(),
                Some("http://localhost:8000".to_string())
            );
            assert_eq!(
                matches.get_one::<String>(backend::ARG_ENVIRONMENT).cloned(),
                Some("development".to_string())
            );
            assert_eq!(
                matches
                    .get_one::<String>(session::ARG_SESSION_COOKIE_NAME)
                    .cloned(),
                Some("__session".to_string())
            );
            assert_eq!(
                matches
                    .get_one::<i64>(session::ARG_SESSION_MAX_AGE_SECONDS)
                    .copied(),
                Some(604_800)
            );
            assert!(!matches.get_flag(session::ARG_SESSION_ENCRYPT));
            assert_eq!(
                matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                Some(0)
            );
        });
    }

    #[test]
    fn test_session_secret_is_required() {
        temp_env::with_vars(clean_env(), || {
            let result = new().try_get_matches_from(vec!["gatehouse"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_check_args() {
        temp_env::with_vars(clean_env(), || {
            let matches = new().get_matches_from(vec![
                "gatehouse",
                "--port",
                "3000",
                "--api-base-url",
                "https://api.example.com",
                "--environment",
                "production",
                "--session-secret",
                "new",
                "--session-secret",
                "old",
                "--session-cookie-name",
                "__gh",
                "--session-max-age-seconds",
                "60",
                "--session-encrypt",
            ]);

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(3000));
            assert_eq!(
                matches.get_one::<String>(backend::ARG_API_BASE_URL).cloned(),
                Some("https://api.example.com".to_string())
            );
            assert_eq!(
                matches
                    .get_many::<String>(session::ARG_SESSION_SECRET)
                    .map(|values| values.cloned().collect::<Vec<_>>()),
                Some(vec!["new".to_string(), "old".to_string()])
            );
            assert_eq!(
                matches
                    .get_one::<i64>(session::ARG_SESSION_MAX_AGE_SECONDS)
                    .copied(),
                Some(60)
            );
            assert!(matches.get_flag(session::ARG_SESSION_ENCRYPT));
        });
    }

    #[test]
    fn test_check_env() {
        let vars = env_with(&[
            ("GATEHOUSE_PORT", "443"),
            ("GATEHOUSE_API_BASE_URL", "http://backend:8000"),
            ("GATEHOUSE_ENV", "production"),
            ("GATEHOUSE_SESSION_SECRETS", "new,old"),
            ("GATEHOUSE_SESSION_ENCRYPT", "true"),
            ("GATEHOUSE_LOG_LEVEL", "info"),
        ]);

        temp_env::with_vars(vars, || {
            let matches = new().get_matches_from(vec!["gatehouse"]);
            let options = session::Options::parse(&matches);
            assert!(options.is_ok());

            if let Ok(options) = options {
                let secrets: Vec<&str> = options
                    .secrets
                    .iter()
                    .map(|secret| secret.expose_secret())
                    .collect();
                assert_eq!(secrets, vec!["new", "old"]);
                assert!(options.encrypt);
            }

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
            assert_eq!(
                matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                Some(2)
            );
        });
    }

    #[test]
    fn test_invalid_environment_rejected() {
        temp_env::with_vars(clean_env(), || {
            let result = new().try_get_matches_from(vec![
                "gatehouse",
                "--session-secret",
                "s",
                "--environment",
                "staging",
            ]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            let vars = env_with(&[
                ("GATEHOUSE_LOG_LEVEL", level),
                ("GATEHOUSE_SESSION_SECRETS", "s"),
            ]);

            temp_env::with_vars(vars, || {
                let matches = new().get_matches_from(vec!["gatehouse"]);
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
            temp_env::with_vars(clean_env(), || {
                let mut args = vec![
                    "gatehouse".to_string(),
                    "--session-secret".to_string(),
                    "s".to_string(),
                ];

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
}
