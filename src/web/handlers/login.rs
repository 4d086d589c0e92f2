use super::{with_session, DASHBOARD, LOGIN};
use crate::{
    backend::Credentials,
    session::{ERROR, TOKEN, USER_ID},
    web::{pages, WebState},
};
use axum::{
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Shown for every rejected login, whatever the backend said.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub async fn page(headers: HeaderMap, Extension(state): Extension<Arc<WebState>>) -> Response {
    let session = state.sessions().load_from_headers(&headers);

    if session.is_authenticated() {
        return Redirect::to(DASHBOARD).into_response();
    }

    let error = session.get_as::<String>(ERROR);

    // committing drops the flash that was just shown
    with_session(
        state.sessions(),
        &session,
        Html(pages::login(error.as_deref())),
    )
}

pub async fn submit(
    headers: HeaderMap,
    Extension(state): Extension<Arc<WebState>>,
    Form(credentials): Form<Credentials>,
) -> Response {
    let mut session = state.sessions().load_from_headers(&headers);

    match state.auth().login(&credentials).await {
        Ok(result) => {
            session.set(USER_ID, result.user.id);
            match result.token {
                Some(token) => session.set(TOKEN, token),
                None => {
                    session.unset(TOKEN);
                }
            }

            info!(user_id = result.user.id, "User logged in");

            with_session(state.sessions(), &session, Redirect::to(DASHBOARD))
        }
        Err(err) => {
            debug!("Login rejected: {err}");

            session.flash(ERROR, INVALID_CREDENTIALS);

            with_session(state.sessions(), &session, Redirect::to(LOGIN))
        }
    }
}
