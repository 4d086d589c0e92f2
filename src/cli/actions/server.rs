use crate::{
    backend::{ApiClient, AuthClient},
    cli::telemetry,
    session::{CookieSecurity, SessionConfig, SessionStore},
    web::{self, WebState},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::info;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub api_base_url: Url,
    pub production: bool,
    pub session_secrets: Vec<SecretString>,
    pub session_cookie_name: String,
    pub session_max_age_seconds: i64,
    pub session_encrypt: bool,
}

impl Args {
    /// Cookie settings derived from the arguments.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        let security = if self.session_encrypt {
            CookieSecurity::Private
        } else {
            CookieSecurity::Signed
        };

        SessionConfig::default()
            .with_name(self.session_cookie_name.clone())
            .with_secure(self.production)
            .with_max_age(time::Duration::seconds(self.session_max_age_seconds))
            .with_security(security)
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the session secrets are unusable, the HTTP client cannot
/// be built, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let sessions = SessionStore::new(args.session_config(), &args.session_secrets)
        .context("invalid session configuration")?;

    let api = ApiClient::new(args.api_base_url).context("failed to build the API client")?;

    let state = Arc::new(WebState::new(sessions, AuthClient::new(api)));

    let result = web::new(args.port, state).await;

    telemetry::shutdown_tracer();

    result
}

fn log_startup_args(args: &Args) {
    info!(
        port = args.port,
        api_base_url = %args.api_base_url,
        production = args.production,
        session_cookie_name = %args.session_cookie_name,
        session_max_age_seconds = args.session_max_age_seconds,
        session_encrypt = args.session_encrypt,
        session_secrets = args.session_secrets.len(),
        "Starting gatehouse"
    );
}
