// Session and flash cookies
//
// The session cookie carries an opaque token resolved by the session
// store. The flash cookie carries a one-shot banner for the next page.

use axum::http::{header, HeaderMap};
use cookie::{time::Duration, Cookie, SameSite};

/// Name of the one-shot banner cookie
pub const FLASH_COOKIE_NAME: &str = "flash";

#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    /// Whether to set the Secure flag (should be true behind HTTPS)
    pub secure: bool,
    pub max_age_secs: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Danger,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Danger => "danger",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "success" => Some(FlashLevel::Success),
            "danger" => Some(FlashLevel::Danger),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.into(),
        }
    }
}

/// Set-Cookie value that opens a session
pub fn session_cookie(token: &str, config: &CookieConfig) -> String {
    Cookie::build((config.name.clone(), token.to_string()))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(config.max_age_secs))
        .build()
        .to_string()
}

/// Set-Cookie value that makes the browser drop the session
pub fn clear_session_cookie(config: &CookieConfig) -> String {
    let mut cookie = Cookie::build((config.name.clone(), ""))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();
    cookie.to_string()
}

pub fn flash_cookie(flash: &Flash) -> String {
    let value = format!("{}|{}", flash.level.as_str(), flash.message);
    Cookie::build((FLASH_COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
        .encoded()
        .to_string()
}

pub fn clear_flash_cookie() -> String {
    let mut cookie = Cookie::build((FLASH_COOKIE_NAME, "")).path("/").build();
    cookie.make_removal();
    cookie.to_string()
}

/// Find a cookie value by name across all `Cookie` headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| Cookie::split_parse_encoded(v.to_string()))
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

pub fn read_flash(headers: &HeaderMap) -> Option<Flash> {
    let raw = read_cookie(headers, FLASH_COOKIE_NAME)?;
    let (level, message) = raw.split_once('|')?;

    Some(Flash {
        level: FlashLevel::parse(level)?,
        message: message.to_string(),
    })
}
