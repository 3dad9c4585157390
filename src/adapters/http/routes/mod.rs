mod auth;
mod review;

use axum::{Router, http::StatusCode, routing::get};

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(review::router())
        .route("/health", get(|| async { StatusCode::OK }))
}
