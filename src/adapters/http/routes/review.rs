use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    routing::post,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{app_state::AppState, session_cookies::current_subject},
    app_error::AppResult,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/get_comment", post(get_comment))
        .route("/post_comment", post(post_comment))
}

#[derive(Deserialize)]
struct GetCommentPayload {
    repo_url: String,
    pr_number: u64,
}

#[derive(Deserialize)]
struct PostCommentPayload {
    text: String,
    pr_number: u64,
    repo_url: String,
}

#[derive(Serialize)]
struct CommentResponse {
    comment: String,
}

async fn get_comment(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(payload): Json<GetCommentPayload>,
) -> AppResult<impl IntoResponse> {
    current_subject(&headers, &jar, &app_state)?;

    let comment = app_state
        .review_use_cases
        .draft_comment(&payload.repo_url, payload.pr_number)
        .await?;
    Ok(Json(CommentResponse { comment }))
}

async fn post_comment(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(payload): Json<PostCommentPayload>,
) -> AppResult<impl IntoResponse> {
    current_subject(&headers, &jar, &app_state)?;

    app_state
        .review_use_cases
        .post_comment(&payload.repo_url, payload.pr_number, &payload.text)
        .await?;
    Ok(Json(CommentResponse {
        comment: "Comment posted successfully.".to_string(),
    }))
}
