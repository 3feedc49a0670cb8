use crate::views::pages;
use axum::{
    http::Uri,
    response::{IntoResponse, Response},
};
use tracing::debug;

pub async fn fallback_handler(uri: Uri) -> Response {
    debug!(path = %uri.path(), "No route matched");
    pages::not_found().into_response()
}
