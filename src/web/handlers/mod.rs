pub mod dashboard;
pub mod health;
pub mod login;
pub mod logout;
pub mod register;

// common functions for the handlers
use crate::session::{Session, SessionError, SessionStore};
use axum::{
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use tracing::error;

pub(crate) const LOGIN: &str = "/login";
pub(crate) const DASHBOARD: &str = "/dashboard";

pub async fn root() -> Redirect {
    Redirect::to(DASHBOARD)
}

/// Attach a `Set-Cookie` header to `response`, or answer 500 when the cookie
/// could not be produced.
pub(crate) fn with_cookie(
    cookie: Result<HeaderValue, SessionError>,
    response: impl IntoResponse,
) -> Response {
    match cookie {
        Ok(cookie) => ([(SET_COOKIE, cookie)], response).into_response(),
        Err(err) => {
            error!("Failed to write session cookie: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub(crate) fn with_session(
    store: &SessionStore,
    session: &Session,
    response: impl IntoResponse,
) -> Response {
    with_cookie(store.commit(session), response)
}
