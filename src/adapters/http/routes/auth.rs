use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    adapters::http::{
        app_state::AppState,
        session_cookies::{
            access_token, clear_session_cookies, current_subject, refresh_token,
            set_access_cookie, set_session_cookies,
        },
    },
    app_error::{AppError, AppResult},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/github/authorize", get(github_authorize))
        .route("/github/callback", post(github_callback))
        .route("/refresh", post(refresh))
        .route("/session", get(session))
        .route("/logout", post(logout))
}

#[derive(Deserialize)]
struct CallbackPayload {
    code: String,
    #[serde(default)]
    state: String,
}

#[derive(Serialize)]
struct SessionResponse {
    user_id: String,
}

async fn github_authorize(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let started = app_state.login_use_cases.start().await?;
    Ok(Json(started))
}

async fn github_callback(
    State(app_state): State<AppState>,
    Json(payload): Json<CallbackPayload>,
) -> AppResult<impl IntoResponse> {
    let outcome = app_state
        .login_use_cases
        .complete(&payload.code, &payload.state)
        .await?;

    let mut headers = HeaderMap::new();
    set_session_cookies(
        &mut headers,
        &outcome.tokens,
        app_state.session_use_cases.access_ttl(),
        app_state.session_use_cases.refresh_ttl(),
        app_state.config.cookie_secure,
    )?;

    Ok((StatusCode::OK, headers, Json(outcome.profile)))
}

async fn refresh(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let token = refresh_token(&headers, &jar)
        .ok_or_else(|| AppError::InvalidCredential("missing refresh credential".into()))?;

    let refreshed = app_state.session_use_cases.refresh(&token).await?;

    let mut out = HeaderMap::new();
    set_access_cookie(
        &mut out,
        &refreshed.access_token,
        app_state.session_use_cases.access_ttl(),
        app_state.config.cookie_secure,
    )?;
    Ok((StatusCode::OK, out, Json(refreshed)))
}

async fn session(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let user_id = current_subject(&headers, &jar, &app_state)?;
    Ok(Json(SessionResponse { user_id }))
}

/// Revokes the session if a presented credential is still live, then clears cookies.
async fn logout(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let candidates = [access_token(&headers, &jar), refresh_token(&headers, &jar)];

    let mut revoked = false;
    for token in candidates.into_iter().flatten() {
        match app_state.session_use_cases.revoke_with(&token).await {
            Ok(_) => {
                revoked = true;
                break;
            }
            Err(e @ AppError::StoreUnavailable(_)) => return Err(e),
            Err(e) => warn!(error = %e, "Logout credential not accepted"),
        }
    }
    if !revoked {
        warn!("Logout without a live credential");
    }

    let mut out = HeaderMap::new();
    clear_session_cookies(&mut out, app_state.config.cookie_secure)?;
    Ok((StatusCode::OK, out))
}
