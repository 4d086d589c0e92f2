//! JSON client for the remote auth API. Every call goes through [`ApiClient::request`],
//! which reads the body as text before parsing so empty and non-JSON bodies are
//! reported through one error type instead of panicking in a decoder. The client
//! carries a cookie jar so cookies set by one response (the registration bootstrap
//! in particular) go out with the next request of the same client.

use reqwest::{
    cookie::{CookieStore, Jar},
    header::{
        HeaderMap, HeaderValue, InvalidHeaderValue, ACCEPT, CONTENT_TYPE, COOKIE, SET_COOKIE,
    },
    Client, Method, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Message used when a failed response carries no `message` field.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred.";

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Unable to reach the server: {0}")]
    Transport(#[from] reqwest::Error),
    /// `status` is set when the server answered outside 200-299.
    #[error("Invalid JSON returned from server.")]
    InvalidResponseFormat { status: Option<StatusCode> },
    #[error("{message}")]
    RequestFailed { status: StatusCode, message: String },
    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

impl HttpError {
    /// HTTP status of a rejected request, even when its body was unreadable.
    /// `None` when the server never answered with a non-2xx status.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            Self::InvalidResponseFormat { status } => *status,
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    jar: Arc<Jar>,
}

impl ApiClient {
    /// Build a client for `base_url` with its own connection pool.
    ///
    /// # Errors
    /// Returns an error if the underlying reqwest client cannot be built.
    pub fn new(base_url: Url) -> Result<Self, HttpError> {
        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    #[must_use]
    pub fn with_client(http: Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            jar: Arc::new(Jar::default()),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Same connection pool and base URL, empty cookie jar.
    ///
    /// Page handlers take a scoped client per user action so cookies the backend
    /// sets for one visitor are never replayed for another.
    #[must_use]
    pub fn scoped(&self) -> Self {
        Self::with_client(self.http.clone(), self.base_url.clone())
    }

    /// Send a request and decode the JSON response.
    ///
    /// `headers` are merged over the JSON defaults; `body` is sent as-is and is
    /// expected to be JSON already. Returns `Ok(None)` for an empty or `null` body.
    ///
    /// # Errors
    /// - [`HttpError::Transport`] if the server cannot be reached.
    /// - [`HttpError::InvalidResponseFormat`] if a non-empty body is not JSON, whatever the status.
    /// - [`HttpError::RequestFailed`] for statuses outside 200-299.
    #[instrument(skip(self, headers, body))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        headers: Option<HeaderMap>,
        body: Option<String>,
    ) -> Result<Option<T>, HttpError> {
        let url = self.build_url(endpoint)?;

        let mut request_headers = default_headers();
        if let Some(cookies) = self.jar.cookies(&url) {
            request_headers.insert(COOKIE, cookies);
        }
        if let Some(overrides) = headers {
            for (name, value) in &overrides {
                request_headers.insert(name.clone(), value.clone());
            }
        }

        let mut builder = self
            .http
            .request(method, url.clone())
            .headers(request_headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        {
            let mut set_cookies = response.headers().get_all(SET_COOKIE).iter();
            self.jar.set_cookies(&mut set_cookies, &url);
        }
        let text = response.text().await?;

        debug!(status = status.as_u16(), "API responded");

        decode_response(status, &text)
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        headers: Option<HeaderMap>,
    ) -> Result<Option<T>, HttpError> {
        self.request(endpoint, Method::GET, headers, None).await
    }

    /// Serialize `body` to JSON and POST it.
    ///
    /// # Errors
    /// Returns [`HttpError::Encode`] if the body cannot be serialized, otherwise see
    /// [`ApiClient::request`].
    pub async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<Option<T>, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_string(body).map_err(HttpError::Encode)?;
        self.request(endpoint, Method::POST, None, Some(payload))
            .await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<Option<T>, HttpError> {
        self.request(endpoint, Method::POST, None, None).await
    }

    fn build_url(&self, endpoint: &str) -> Result<Url, HttpError> {
        Ok(Url::parse(&join_url(self.base_url.as_str(), endpoint))?)
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

fn join_url(base: &str, endpoint: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let endpoint = endpoint.trim();

    if base.is_empty() {
        endpoint.to_string()
    } else {
        format!("{}/{}", base, endpoint.trim_start_matches('/'))
    }
}

/// Parse first, then look at the status: a garbled body is a format error even
/// on a 500, tagged with that status.
fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    text: &str,
) -> Result<Option<T>, HttpError> {
    let data = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str::<Value>(text).map_err(|_| HttpError::InvalidResponseFormat {
            status: (!status.is_success()).then_some(status),
        })?
    };

    if !status.is_success() {
        let message = data
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
            .to_string();
        return Err(HttpError::RequestFailed { status, message });
    }

    if data.is_null() {
        return Ok(None);
    }

    serde_json::from_value(data)
        .map(Some)
        .map_err(|_| HttpError::InvalidResponseFormat { status: None })
}
