//! # Gatehouse (session-backed auth front end)
//!
//! `gatehouse` serves the login, register and dashboard pages of an application
//! whose accounts live in a remote JSON API. It never stores users itself: every
//! credential check is delegated to the backend, and the only local state is a
//! signed cookie carrying the user id, the backend bearer token and one-shot
//! flash messages.
//!
//! ## Request flow
//!
//! 1. The page handler loads the [`session::Session`] from the request's `Cookie`
//!    header. Tampered, expired or unreadable cookies load as an empty session.
//! 2. Form submissions go through [`backend::AuthClient`], which wraps the JSON
//!    [`backend::ApiClient`] and turns transport and HTTP failures into
//!    user-safe messages.
//! 3. The handler mutates the session and commits it into a `Set-Cookie` header on
//!    the response (or destroys it on logout).
//!
//! ## Session cookies
//!
//! Cookies are signed (or encrypted) with the first configured secret and
//! verified against every configured secret in order, so secrets can be rotated
//! without logging users out.

pub mod backend;
pub mod cli;
pub mod session;
pub mod web;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
