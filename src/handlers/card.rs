use crate::auth::session::CurrentUser;
use crate::core::error::{PageError, StoreError};
use crate::core::state::AppState;
use crate::models::requests::{CardForm, CardQuery};
use crate::utils::cookie::{read_flash, Flash};
use crate::views::pages::{self, flash_redirect};
use axum::{
    extract::{Form, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

/// GET /registrar_cartao
pub async fn register_card_page(
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
) -> impl IntoResponse {
    pages::register_card(
        &user.username,
        user.rfid_uid.as_deref(),
        read_flash(&headers).as_ref(),
    )
}

/// Bind an RFID card to the logged-in account
///
/// POST /registrar_cartao
pub async fn register_card_handler(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<CardForm>,
) -> Result<Response, PageError> {
    let rfid_uid = form.rfid_uid.trim();
    if rfid_uid.is_empty() {
        return Ok(flash_redirect(
            "/registrar_cartao",
            &Flash::danger("Card UID is required."),
        ));
    }

    match state.users.set_rfid(&user, rfid_uid) {
        Ok(()) => {
            info!(user_id = user.id, rfid_uid = %rfid_uid, "RFID card registered");
            Ok(flash_redirect(
                "/",
                &Flash::success("RFID card registered successfully!"),
            ))
        }
        Err(StoreError::DuplicateRfid) => {
            warn!(user_id = user.id, rfid_uid = %rfid_uid, "RFID card already owned by another user");
            Ok(flash_redirect(
                "/registrar_cartao",
                &Flash::danger("This card is already registered to another user."),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// Called by the turnstile reader: is this card known?
///
/// GET /verificar_cartao?rfid_uid=<uid>
pub async fn verify_card_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CardQuery>,
) -> Result<Response, PageError> {
    let rfid_uid = params.rfid_uid.as_deref().map(str::trim).unwrap_or("");

    let known = !rfid_uid.is_empty() && state.users.find_by_rfid(rfid_uid)?.is_some();

    if known {
        Ok((StatusCode::OK, "valido").into_response())
    } else {
        warn!(rfid_uid = %rfid_uid, "Unknown RFID card presented");
        Ok((StatusCode::UNAUTHORIZED, "invalido").into_response())
    }
}
