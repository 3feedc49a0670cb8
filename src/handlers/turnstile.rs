use crate::auth::session::CurrentUser;
use crate::core::state::AppState;
use crate::utils::cookie::{read_flash, Flash};
use crate::views::pages::{self, flash_redirect};
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

/// GET /abrir_catraca
pub async fn turnstile_page(
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
) -> impl IntoResponse {
    pages::turnstile(&user.username, read_flash(&headers).as_ref())
}

/// POST /abrir_catraca
pub async fn open_turnstile_handler(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Response {
    let flash = match state.device.open_turnstile().await {
        Ok(()) => {
            info!(user_id = user.id, "Turnstile opened");
            Flash::success("Turnstile opened successfully!")
        }
        Err(e) => {
            warn!(user_id = user.id, error = %e, "Failed to open turnstile");
            Flash::danger(e.user_message())
        }
    };

    flash_redirect("/", &flash)
}
