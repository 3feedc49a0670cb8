// Login, logout and the session gate for protected routes

use crate::core::error::AuthError;
use crate::core::state::AppState;
use crate::models::user::{Session, User};
use crate::utils::auth::secrets_match;
use crate::utils::cookie::read_cookie;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;
use tracing::{info, warn};

/// Check credentials and open a session
pub fn login(state: &AppState, username: &str, password: &str) -> Result<Session, AuthError> {
    let user = match state.users.find_by_username(username)? {
        Some(user) => user,
        None => {
            warn!(username = %username, "Login attempt for unknown user");
            return Err(AuthError::InvalidCredentials);
        }
    };

    if !secrets_match(password, &user.password) {
        warn!(username = %username, "Login attempt with wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    let session = state.sessions.create(user.id)?;
    info!(user_id = user.id, username = %user.username, "User logged in");

    Ok(session)
}

/// Drop the session behind `token`, if any
pub fn logout(state: &AppState, token: Option<&str>) -> Result<(), AuthError> {
    if let Some(token) = token {
        state.sessions.delete(token)?;
        info!("User logged out");
    }
    Ok(())
}

/// The authenticated account behind the request's session cookie.
///
/// Taking this as a handler argument gates the route: requests without
/// a live session are redirected to `/login`.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        require_session(state, &parts.headers).map(CurrentUser)
    }
}

pub fn require_session(
    state: &AppState,
    headers: &axum::http::HeaderMap,
) -> Result<User, AuthError> {
    let token = read_cookie(headers, &state.cookie_config.name)
        .ok_or(AuthError::Unauthenticated)?;

    let session = state
        .sessions
        .get(&token)?
        .ok_or(AuthError::Unauthenticated)?;

    state
        .users
        .find_by_id(session.user_id)?
        .ok_or(AuthError::Unauthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::test_support::create_test_state;
    use axum::http::{header, HeaderMap, HeaderValue};

    fn cookie_headers(state: &AppState, token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = format!("{}={}", state.cookie_config.name, token);
        headers.insert(header::COOKIE, HeaderValue::from_str(&value).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_login_with_matching_password() {
        let state = create_test_state().await;
        state.users.create("a", "x").unwrap();

        let session = login(&state, "a", "x").unwrap();
        assert!(state.sessions.get(&session.token).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let state = create_test_state().await;
        state.users.create("a", "y").unwrap();

        assert!(matches!(
            login(&state, "a", "x"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let state = create_test_state().await;
        assert!(matches!(
            login(&state, "ghost", "x"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_require_session_resolves_user() {
        let state = create_test_state().await;
        let user = state.users.create("a", "x").unwrap();
        let session = login(&state, "a", "x").unwrap();

        let resolved = require_session(&state, &cookie_headers(&state, &session.token)).unwrap();
        assert_eq!(resolved, user);
    }

    #[tokio::test]
    async fn test_require_session_without_cookie() {
        let state = create_test_state().await;
        assert!(matches!(
            require_session(&state, &HeaderMap::new()),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let state = create_test_state().await;
        state.users.create("a", "x").unwrap();
        let session = login(&state, "a", "x").unwrap();

        logout(&state, Some(&session.token)).unwrap();

        assert!(matches!(
            require_session(&state, &cookie_headers(&state, &session.token)),
            Err(AuthError::Unauthenticated)
        ));
        assert!(logout(&state, None).is_ok());
    }
}
