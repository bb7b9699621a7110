//! Session cookie helpers

use axum::http::{header::COOKIE, HeaderMap};

use study_shared::config::CookieSettings;

/// Refresh cookies are only sent to the auth endpoints
pub const REFRESH_COOKIE_PATH: &str = "/api/v1/auth";

/// Value of cookie `name`, if the request carries it. An empty value is returned as-is.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.trim_matches('"').to_string())
        })
        .next()
}

pub fn build_cookie(settings: &CookieSettings, name: &str, value: &str, path: &str, max_age: i64) -> String {
    let mut cookie = format!("{name}={value}; Path={path}; Max-Age={max_age}; HttpOnly; SameSite=Lax");
    if settings.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn session_cookie(settings: &CookieSettings, token: &str, max_age: i64) -> String {
    build_cookie(settings, &settings.session_name, token, "/", max_age)
}

pub fn refresh_cookie(settings: &CookieSettings, token: &str, max_age: i64) -> String {
    build_cookie(settings, &settings.refresh_name, token, REFRESH_COOKIE_PATH, max_age)
}

pub fn clear_session_cookie(settings: &CookieSettings) -> String {
    build_cookie(settings, &settings.session_name, "", "/", 0)
}

pub fn clear_refresh_cookie(settings: &CookieSettings) -> String {
    build_cookie(settings, &settings.refresh_name, "", REFRESH_COOKIE_PATH, 0)
}
