//! Test utilities for unit and route tests.
//!
//! This module provides:
//! - In-memory and failing implementations of the expiring store
//! - Stubs for the identity provider, pull request host and review generator
//! - `TestAppStateBuilder` for running routers under `axum_test::TestServer`

mod app_state_builder;
mod auth_mocks;
mod review_mocks;
mod store_mocks;

pub use app_state_builder::*;
pub use auth_mocks::*;
pub use review_mocks::*;
pub use store_mocks::*;

use axum::Router;
use secrecy::SecretString;
use url::Url;

use crate::application::credentials::CredentialCodec;

pub const TEST_SECRET: &str = "test-secret-for-route-tests";

pub fn test_codec() -> CredentialCodec {
    CredentialCodec::new(&SecretString::new(TEST_SECRET.into())).unwrap()
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_fake_server(app: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}
