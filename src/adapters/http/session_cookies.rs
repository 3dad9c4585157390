//! Session cookie helpers and credential extraction for route handlers.

use axum::http::{HeaderMap, HeaderValue, header};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::use_cases::session::SessionTokens,
};

pub const ACCESS_COOKIE: &str = "auth_token";
pub const REFRESH_COOKIE: &str = "refresh_token";
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

/// Appends a cookie to the headers, handling parse errors gracefully
pub(crate) fn append_cookie(headers: &mut HeaderMap, cookie: Cookie<'_>) -> Result<(), AppError> {
    let value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|_| AppError::Internal("Failed to build cookie header".into()))?;
    headers.append(header::SET_COOKIE, value);
    Ok(())
}

fn session_cookie(name: &'static str, value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .build()
}

pub(crate) fn set_access_cookie(
    headers: &mut HeaderMap,
    access_token: &str,
    ttl: Duration,
    secure: bool,
) -> AppResult<()> {
    append_cookie(
        headers,
        session_cookie(ACCESS_COOKIE, access_token.to_string(), ttl, secure),
    )
}

pub(crate) fn set_session_cookies(
    headers: &mut HeaderMap,
    tokens: &SessionTokens,
    access_ttl: Duration,
    refresh_ttl: Duration,
    secure: bool,
) -> AppResult<()> {
    set_access_cookie(headers, &tokens.access_token, access_ttl, secure)?;
    append_cookie(
        headers,
        session_cookie(REFRESH_COOKIE, tokens.refresh_token.clone(), refresh_ttl, secure),
    )
}

/// Clears both session cookies (logout)
pub(crate) fn clear_session_cookies(headers: &mut HeaderMap, secure: bool) -> AppResult<()> {
    append_cookie(
        headers,
        session_cookie(ACCESS_COOKIE, String::new(), Duration::ZERO, secure),
    )?;
    append_cookie(
        headers,
        session_cookie(REFRESH_COOKIE, String::new(), Duration::ZERO, secure),
    )
}

/// Access credential from `Authorization: Bearer`, falling back to the `auth_token` cookie.
pub(crate) fn access_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| non_empty_cookie(jar, ACCESS_COOKIE))
}

/// Refresh credential from the `refresh_token` cookie, falling back to `X-Refresh-Token`.
pub(crate) fn refresh_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    non_empty_cookie(jar, REFRESH_COOKIE).or_else(|| {
        headers
            .get(REFRESH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    })
}

fn non_empty_cookie(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Subject of the caller's access credential.
pub(crate) fn current_subject(
    headers: &HeaderMap,
    jar: &CookieJar,
    app_state: &AppState,
) -> AppResult<String> {
    let token = access_token(headers, jar)
        .ok_or_else(|| AppError::InvalidCredential("missing access credential".into()))?;
    app_state.session_use_cases.verify_access(&token)
}
