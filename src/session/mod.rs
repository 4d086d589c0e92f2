//! Cookie-backed sessions.
//!
//! A [`Session`] is a plain value: handlers load it from the request with
//! [`SessionStore::load`], mutate it, and hand it back to
//! [`SessionStore::commit`] (or [`SessionStore::destroy`]) to produce the
//! `Set-Cookie` header for the response. Nothing is kept server side.

mod codec;
mod config;
mod data;
mod store;

use axum::http::header::InvalidHeaderValue;
use thiserror::Error;

pub use self::config::{
    CookieSecurity, SessionConfig, DEFAULT_COOKIE_NAME, DEFAULT_MAX_AGE_SECONDS,
};
pub use self::data::{Session, ERROR, TOKEN, USER_ID};
pub use self::store::SessionStore;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("at least one session secret is required")]
    MissingSecret,
    #[error("session secrets must not be empty")]
    EmptySecret,
    #[error("failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to encode session cookie: {0}")]
    Encode(String),
    #[error("failed to decode session cookie: {0}")]
    Decode(String),
    #[error("unsupported session cookie version: {0}")]
    UnsupportedVersion(u8),
    #[error("session cookie is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
    #[error("invalid Set-Cookie header: {0}")]
    Header(#[from] InvalidHeaderValue),
}
