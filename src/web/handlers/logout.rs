use super::{with_cookie, LOGIN};
use crate::web::WebState;
use axum::{
    http::HeaderMap,
    response::{Redirect, Response},
    Extension,
};
use std::sync::Arc;

pub async fn logout(headers: HeaderMap, Extension(state): Extension<Arc<WebState>>) -> Response {
    let session = state.sessions().load_from_headers(&headers);

    // never fails; backend errors are only logged
    state.auth().logout().await;

    with_cookie(state.sessions().destroy(session), Redirect::to(LOGIN))
}
