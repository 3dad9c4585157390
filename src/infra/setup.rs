use crate::{
    adapters::{
        gemini::GeminiClient,
        github::{GithubOAuthClient, GithubPullRequestClient},
        http::app_state::AppState,
    },
    application::{
        credentials::CredentialCodec,
        use_cases::{
            github_login::GithubLoginUseCases, review::ReviewUseCases,
            session::{ExpiringStore, SessionUseCases},
        },
    },
    infra::{
        config::AppConfig, error::InfraError, http_client::try_build_client,
        redis_store::RedisExpiringStore,
    },
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state() -> Result<AppState, InfraError> {
    let config = AppConfig::from_env()?;

    let codec = CredentialCodec::new(&config.jwt_secret).map_err(InfraError::Credentials)?;
    let store: Arc<dyn ExpiringStore> =
        Arc::new(RedisExpiringStore::connect(&config.redis_url, config.redis_timeout).await?);

    let http = try_build_client().map_err(InfraError::HttpClient)?;

    let session_use_cases = Arc::new(SessionUseCases::new(
        codec,
        store.clone(),
        config.access_token_ttl,
        config.refresh_token_ttl,
    ));

    let identity = Arc::new(GithubOAuthClient::new(
        http.clone(),
        config.github_oauth_base.clone(),
        config.github_api_base.clone(),
        config.github_client_id.clone(),
        config.github_client_secret.clone(),
        config.github_redirect_uri.clone(),
    ));
    let login_use_cases = GithubLoginUseCases::new(
        identity,
        store,
        session_use_cases.clone(),
        config.oauth_state_ttl,
    );

    let pulls = Arc::new(GithubPullRequestClient::new(
        http.clone(),
        config.github_api_base.clone(),
        config.github_token.clone(),
    ));
    let gemini = Arc::new(GeminiClient::new(
        http,
        config.gemini_api_base.clone(),
        config.gemini_model.clone(),
        config.gemini_api_key.clone(),
    ));
    let review_use_cases = ReviewUseCases::new(pulls, gemini);

    Ok(AppState {
        config: Arc::new(config),
        session_use_cases,
        login_use_cases: Arc::new(login_use_cases),
        review_use_cases: Arc::new(review_use_cases),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "reviewbot=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer().with_target(false).with_level(true).pretty();

    // File (structured JSON logs); skipped when app.log can't be created
    let json_layer = File::create("app.log").ok().map(|file| {
        fmt::layer()
            .json()
            .with_writer(file)
            .with_current_span(true)
            .with_span_list(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
