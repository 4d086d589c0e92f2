use super::{with_cookie, LOGIN};
use crate::{
    session::{TOKEN, USER_ID},
    web::{pages, WebState},
};
use axum::{
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use std::sync::Arc;
use tracing::{error, warn};

pub async fn dashboard(headers: HeaderMap, Extension(state): Extension<Arc<WebState>>) -> Response {
    let session = state.sessions().load_from_headers(&headers);

    let Some(token) = session
        .get_as::<String>(TOKEN)
        .filter(|_| session.has(USER_ID))
    else {
        return Redirect::to(LOGIN).into_response();
    };

    match state.auth().dashboard(&token).await {
        Ok(data) => Html(pages::dashboard(&data.user)).into_response(),

        // the backend answered and refused the token
        Err(err) if err.status().is_some() => {
            warn!("Dashboard request rejected: {err}");

            with_cookie(state.sessions().destroy(session), Redirect::to(LOGIN))
        }

        Err(err) => {
            error!("Dashboard request failed: {err}");

            (StatusCode::BAD_GATEWAY, Html(pages::unavailable())).into_response()
        }
    }
}
