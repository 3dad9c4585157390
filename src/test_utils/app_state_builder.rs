//! Test app state builder for HTTP-level testing.
//!
//! `TestAppStateBuilder` wires real use cases over in-memory fakes so routers
//! can be exercised with `axum_test::TestServer`.

use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;
use url::Url;

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::{
        github_login::{GithubLoginUseCases, IdentityProvider},
        review::{PullRequestHost, ReviewGenerator, ReviewUseCases},
        session::{ExpiringStore, SessionUseCases},
    },
    infra::config::AppConfig,
    test_utils::{
        InMemoryExpiringStore, StubIdentityProvider, StubPullRequestHost, StubReviewGenerator,
        TEST_SECRET, sample_files, test_codec,
    },
};

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: SecretString::new(TEST_SECRET.into()),
        access_token_ttl: Duration::hours(24),
        refresh_token_ttl: Duration::days(30),
        github_client_id: "test-client".into(),
        github_client_secret: SecretString::new("test-client-secret".into()),
        github_redirect_uri: None,
        github_token: SecretString::new("ghp_test".into()),
        gemini_api_key: SecretString::new("gemini-test".into()),
        gemini_model: "gemini-2.0-flash".into(),
        github_api_base: Url::parse("https://api.github.com").unwrap(),
        github_oauth_base: Url::parse("https://github.com").unwrap(),
        gemini_api_base: Url::parse("https://generativelanguage.googleapis.com").unwrap(),
        redis_url: "redis://127.0.0.1:6379".into(),
        redis_timeout: std::time::Duration::from_millis(2_000),
        bind_addr: "127.0.0.1:8000".parse().unwrap(),
        cors_origin: HeaderValue::from_static("http://localhost:5173"),
        cookie_secure: true,
        oauth_state_ttl: Duration::minutes(10),
    }
}

pub struct TestAppStateBuilder {
    config: AppConfig,
    store: Arc<dyn ExpiringStore>,
    identity: Arc<dyn IdentityProvider>,
    host: Arc<dyn PullRequestHost>,
    generator: Arc<dyn ReviewGenerator>,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            config: test_config(),
            store: Arc::new(InMemoryExpiringStore::new()),
            identity: Arc::new(StubIdentityProvider::user(42, "octocat")),
            host: Arc::new(StubPullRequestHost::with_files(sample_files())),
            generator: Arc::new(StubReviewGenerator::replying("## Code Review for PR #1")),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ExpiringStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_pull_request_host(mut self, host: Arc<dyn PullRequestHost>) -> Self {
        self.host = host;
        self
    }

    pub fn with_review_generator(mut self, generator: Arc<dyn ReviewGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_config(mut self, f: impl FnOnce(&mut AppConfig)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn build(self) -> AppState {
        let sessions = Arc::new(SessionUseCases::new(
            test_codec(),
            self.store.clone(),
            self.config.access_token_ttl,
            self.config.refresh_token_ttl,
        ));
        let login = GithubLoginUseCases::new(
            self.identity,
            self.store,
            sessions.clone(),
            self.config.oauth_state_ttl,
        );
        let review = ReviewUseCases::new(self.host, self.generator);

        AppState {
            config: Arc::new(self.config),
            session_use_cases: sessions,
            login_use_cases: Arc::new(login),
            review_use_cases: Arc::new(review),
        }
    }
}
