use crate::auth::session;
use crate::core::error::{AuthError, PageError, StoreError};
use crate::core::state::AppState;
use crate::models::requests::CredentialsForm;
use crate::utils::cookie::{clear_session_cookie, flash_cookie, read_cookie, read_flash, session_cookie, Flash};
use crate::views::pages::{self, flash_redirect};
use axum::{
    extract::{Form, State},
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

/// GET /cadastro
pub async fn register_page(headers: HeaderMap) -> impl IntoResponse {
    pages::register(read_flash(&headers).as_ref())
}

/// Create an account, then send the user to the login page
///
/// POST /cadastro
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, PageError> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return Ok(flash_redirect(
            "/cadastro",
            &Flash::danger("Username and password are required."),
        ));
    }

    match state.users.create(username, &form.password) {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "User registered");
            Ok(Redirect::to("/login").into_response())
        }
        Err(StoreError::DuplicateUsername) => {
            warn!(username = %username, "Registration with taken username");
            Ok(flash_redirect(
                "/cadastro",
                &Flash::danger("This username is already taken."),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /login
pub async fn login_page(headers: HeaderMap) -> impl IntoResponse {
    pages::login(read_flash(&headers).as_ref())
}

/// POST /login
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AuthError> {
    let session = session::login(&state, form.username.trim(), &form.password)?;

    Ok((
        AppendHeaders([(
            header::SET_COOKIE,
            session_cookie(&session.token, &state.cookie_config),
        )]),
        Redirect::to("/"),
    )
        .into_response())
}

/// GET /logout
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AuthError> {
    let token = read_cookie(&headers, &state.cookie_config.name);
    session::logout(&state, token.as_deref())?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie(&state.cookie_config))]),
        Redirect::to("/login"),
    )
        .into_response())
}

/// GET /perdeu_cartao
pub async fn lost_card_page(headers: HeaderMap) -> impl IntoResponse {
    pages::lost_card(read_flash(&headers).as_ref())
}

/// Password fallback for users without their card: log in and go
/// straight to the turnstile
///
/// POST /perdeu_cartao
pub async fn lost_card_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AuthError> {
    match session::login(&state, form.username.trim(), &form.password) {
        Ok(session) => {
            let flash = Flash::success("Authentication successful. You can open the turnstile.");
            Ok((
                AppendHeaders([
                    (
                        header::SET_COOKIE,
                        session_cookie(&session.token, &state.cookie_config),
                    ),
                    (header::SET_COOKIE, flash_cookie(&flash)),
                ]),
                Redirect::to("/abrir_catraca"),
            )
                .into_response())
        }
        Err(AuthError::InvalidCredentials) => Ok(flash_redirect(
            "/perdeu_cartao",
            &Flash::danger("Invalid credentials. Please try again."),
        )),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::test_support::create_test_state;
    use axum::http::StatusCode;

    fn credentials(username: &str, password: &str) -> Form<CredentialsForm> {
        Form(CredentialsForm {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    fn set_cookies(response: &Response) -> Vec<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_register_redirects_to_login() {
        let state = create_test_state().await;

        let response = register_handler(State(state.clone()), credentials("alice", "x"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        assert!(state.users.find_by_username("alice").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_register_duplicate_flashes() {
        let state = create_test_state().await;
        state.users.create("alice", "x").unwrap();

        let response = register_handler(State(state), credentials("alice", "y"))
            .await
            .unwrap();

        assert_eq!(response.headers()[header::LOCATION], "/cadastro");
        assert!(set_cookies(&response)[0].starts_with("flash="));
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let state = create_test_state().await;

        let response = register_handler(State(state.clone()), credentials("  ", "x"))
            .await
            .unwrap();

        assert_eq!(response.headers()[header::LOCATION], "/cadastro");
        assert!(state.users.find_by_username("").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_sets_session_cookie() {
        let state = create_test_state().await;
        state.users.create("a", "x").unwrap();

        let response = login_handler(State(state), credentials("a", "x"))
            .await
            .unwrap();

        assert_eq!(response.headers()[header::LOCATION], "/");
        assert!(set_cookies(&response)[0].starts_with("parking_session="));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_plain_text_error() {
        let state = create_test_state().await;
        state.users.create("a", "y").unwrap();

        let err = login_handler(State(state), credentials("a", "x"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_lost_card_success_goes_to_turnstile() {
        let state = create_test_state().await;
        state.users.create("a", "x").unwrap();

        let response = lost_card_handler(State(state), credentials("a", "x"))
            .await
            .unwrap();

        assert_eq!(response.headers()[header::LOCATION], "/abrir_catraca");
        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().any(|c| c.starts_with("parking_session=")));
        assert!(cookies.iter().any(|c| c.starts_with("flash=success")));
    }

    #[tokio::test]
    async fn test_lost_card_failure_stays() {
        let state = create_test_state().await;

        let response = lost_card_handler(State(state), credentials("a", "x"))
            .await
            .unwrap();

        assert_eq!(response.headers()[header::LOCATION], "/perdeu_cartao");
        assert!(set_cookies(&response)[0].starts_with("flash=danger"));
    }
}
