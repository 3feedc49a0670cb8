// HTTP routes configuration

use crate::core::state::AppState;
use crate::handlers::{account, card, fallback, health, spots, turnstile};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Accounts
        .route("/cadastro", get(account::register_page).post(account::register_handler))
        .route("/login", get(account::login_page).post(account::login_handler))
        .route("/logout", get(account::logout_handler))
        .route("/perdeu_cartao", get(account::lost_card_page).post(account::lost_card_handler))

        // Spots
        .route("/", get(spots::index_handler))
        .route("/reservar", post(spots::reserve_handler))
        .route("/liberar", post(spots::release_handler))

        // Cards and turnstile (session required except for the reader check)
        .route("/registrar_cartao", get(card::register_card_page).post(card::register_card_handler))
        .route("/verificar_cartao", get(card::verify_card_handler))
        .route("/abrir_catraca", get(turnstile::turnstile_page).post(turnstile::open_turnstile_handler))

        .route("/health", get(health::health_handler))

        // 404 fallback for all unmatched routes
        .fallback(fallback::fallback_handler)

        .with_state(state)
}
