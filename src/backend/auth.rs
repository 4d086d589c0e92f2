//! Auth operations against the remote API. Errors are logged here and re-raised
//! with a message that is safe to show in a page; raw transport details stay in
//! the logs.

use super::http::{ApiClient, HttpError};
use super::types::{AuthResult, Credentials, DashboardData, Registration};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

pub const LOGIN_PATH: &str = "/api/login";
pub const REGISTER_PATH: &str = "/api/register";
pub const CSRF_COOKIE_PATH: &str = "/sanctum/csrf-cookie";
pub const LOGOUT_PATH: &str = "/logout";
pub const DASHBOARD_PATH: &str = "/api/dashboard";

const LOGIN_FALLBACK: &str = "Login failed";
const REGISTRATION_FALLBACK: &str = "Registration failed";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    LoginFailed(String),
    #[error("{0}")]
    RegistrationFailed(String),
}

impl AuthError {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::LoginFailed(message) | Self::RegistrationFailed(message) => message,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Auth client with a fresh cookie jar, see [`ApiClient::scoped`].
    #[must_use]
    pub fn scoped(&self) -> Self {
        Self::new(self.api.scoped())
    }

    /// # Errors
    /// Returns [`AuthError::LoginFailed`] with the backend message, or a generic one.
    #[instrument(skip_all)]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResult, AuthError> {
        let response = self
            .api
            .post_json::<_, AuthResult>(LOGIN_PATH, credentials)
            .await;

        match response {
            Ok(Some(result)) => Ok(result),
            Ok(None) => {
                error!("Login failed: empty response from backend");
                Err(AuthError::LoginFailed(LOGIN_FALLBACK.to_string()))
            }
            Err(err) => {
                error!("Login failed: {err}");
                Err(AuthError::LoginFailed(user_message(&err, LOGIN_FALLBACK)))
            }
        }
    }

    /// Fetch the CSRF cookie, then register.
    ///
    /// The bootstrap runs on every call; a failed bootstrap aborts before the
    /// registration request is sent.
    ///
    /// # Errors
    /// Returns [`AuthError::RegistrationFailed`] with the backend message, or a generic one.
    #[instrument(skip_all)]
    pub async fn register(&self, payload: &Registration) -> Result<AuthResult, AuthError> {
        match self.try_register(payload).await {
            Ok(Some(result)) => Ok(result),
            Ok(None) => {
                error!("Registration failed: empty response from backend");
                Err(AuthError::RegistrationFailed(
                    REGISTRATION_FALLBACK.to_string(),
                ))
            }
            Err(err) => {
                error!("Registration failed: {err}");
                Err(AuthError::RegistrationFailed(user_message(
                    &err,
                    REGISTRATION_FALLBACK,
                )))
            }
        }
    }

    /// Best effort; the caller tears down its own session regardless.
    #[instrument(skip_all)]
    pub async fn logout(&self) {
        match self.api.post_empty::<Value>(LOGOUT_PATH).await {
            Ok(_) => debug!("Backend session cleared"),
            Err(err) => warn!("Logout failed: {err}"),
        }
    }

    /// Fetch the protected dashboard payload with `token` as bearer credential.
    ///
    /// # Errors
    /// Returns the [`HttpError`] of the request; an empty body is
    /// [`HttpError::InvalidResponseFormat`].
    #[instrument(skip_all)]
    pub async fn dashboard(&self, token: &str) -> Result<DashboardData, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))?,
        );

        self.api
            .get(DASHBOARD_PATH, Some(headers))
            .await?
            .ok_or(HttpError::InvalidResponseFormat { status: None })
    }

    async fn try_register(&self, payload: &Registration) -> Result<Option<AuthResult>, HttpError> {
        self.api.get::<Value>(CSRF_COOKIE_PATH, None).await?;
        self.api.post_json(REGISTER_PATH, payload).await
    }
}

/// Only messages the backend chose to send, or the unreadable-body notice,
/// reach the page. Transport and local errors collapse to `fallback`.
fn user_message(err: &HttpError, fallback: &str) -> String {
    match err {
        HttpError::RequestFailed { message, .. } if !message.trim().is_empty() => {
            message.clone()
        }
        HttpError::InvalidResponseFormat { .. } => err.to_string(),
        _ => fallback.to_string(),
    }
}
