// Server-rendered HTML pages

use crate::models::spot::{SpotStatus, SpotView};
use crate::utils::cookie::{clear_flash_cookie, flash_cookie, Flash};
use askama::Template;
use axum::{
    http::{header, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use tracing::error;

/// A rendered page. Showing a flash consumes it, so the cookie is cleared.
pub struct Page {
    pub status: StatusCode,
    pub html: String,
    pub consumed_flash: bool,
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        let mut response = (self.status, Html(self.html)).into_response();
        if self.consumed_flash {
            if let Ok(value) = clear_flash_cookie().parse() {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

/// 303 to `to`, carrying a banner for the page that follows
pub fn flash_redirect(to: &str, flash: &Flash) -> Response {
    (
        AppendHeaders([(header::SET_COOKIE, flash_cookie(flash))]),
        Redirect::to(to),
    )
        .into_response()
}

/// Render `template` into a page. The flash is only marked consumed when
/// the page actually rendered.
fn render_template<T: Template>(template: T, flash: Option<&Flash>) -> Page {
    match template.render() {
        Ok(html) => Page {
            status: StatusCode::OK,
            html,
            consumed_flash: flash.is_some(),
        },
        Err(e) => {
            error!(error = %e, "Template rendering failed");
            Page {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                html: format!("Template error: {}", e),
                consumed_flash: false,
            }
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    spots: &'a [SpotView],
    flash: Option<&'a Flash>,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate<'a> {
    flash: Option<&'a Flash>,
}

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterTemplate<'a> {
    flash: Option<&'a Flash>,
}

#[derive(Template)]
#[template(path = "lost_card.html")]
struct LostCardTemplate<'a> {
    flash: Option<&'a Flash>,
}

#[derive(Template)]
#[template(path = "register_card.html")]
struct RegisterCardTemplate<'a> {
    username: &'a str,
    current: Option<&'a str>,
    flash: Option<&'a Flash>,
}

#[derive(Template)]
#[template(path = "turnstile.html")]
struct TurnstileTemplate<'a> {
    username: &'a str,
    flash: Option<&'a Flash>,
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate<'a> {
    flash: Option<&'a Flash>,
}

pub fn index(spots: &[SpotView], flash: Option<&Flash>) -> Page {
    render_template(IndexTemplate { spots, flash }, flash)
}

pub fn login(flash: Option<&Flash>) -> Page {
    render_template(LoginTemplate { flash }, flash)
}

pub fn register(flash: Option<&Flash>) -> Page {
    render_template(RegisterTemplate { flash }, flash)
}

pub fn lost_card(flash: Option<&Flash>) -> Page {
    render_template(LostCardTemplate { flash }, flash)
}

pub fn register_card(username: &str, current: Option<&str>, flash: Option<&Flash>) -> Page {
    render_template(
        RegisterCardTemplate {
            username,
            current,
            flash,
        },
        flash,
    )
}

pub fn turnstile(username: &str, flash: Option<&Flash>) -> Page {
    render_template(TurnstileTemplate { username, flash }, flash)
}

pub fn not_found() -> Page {
    let mut page = render_template(NotFoundTemplate { flash: None }, None);
    if page.status == StatusCode::OK {
        page.status = StatusCode::NOT_FOUND;
    }
    page
}
