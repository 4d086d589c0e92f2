use super::LOGIN;
use crate::{
    backend::Registration,
    web::{pages, WebState},
};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use std::sync::Arc;
use tracing::info;

pub async fn page() -> Html<String> {
    Html(pages::register(None, None))
}

pub async fn submit(
    Extension(state): Extension<Arc<WebState>>,
    Form(payload): Form<Registration>,
) -> Response {
    match state.auth().register(&payload).await {
        Ok(result) => {
            info!(user_id = result.user.id, "User registered");

            Redirect::to(LOGIN).into_response()
        }
        Err(err) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(pages::register(Some(err.message()), Some(&payload))),
        )
            .into_response(),
    }
}
