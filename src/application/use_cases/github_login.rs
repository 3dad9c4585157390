use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::{info, instrument};

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::session::{ExpiringStore, SessionTokens, SessionUseCases},
};

/// Authenticated GitHub account, as returned by `GET /user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubProfile {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl GithubProfile {
    pub fn subject(&self) -> String {
        self.id.to_string()
    }
}

/// External identity provider: builds the consent URL and turns an
/// authorization code into the caller's profile.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn authorize_url(&self, state: &str) -> AppResult<String>;
    async fn exchange_code(&self, code: &str) -> AppResult<GithubProfile>;
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginStart {
    pub state: String,
    pub auth_url: String,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub profile: GithubProfile,
    pub tokens: SessionTokens,
}

#[derive(Clone)]
pub struct GithubLoginUseCases {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn ExpiringStore>,
    sessions: Arc<SessionUseCases>,
    state_ttl: Duration,
}

impl GithubLoginUseCases {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn ExpiringStore>,
        sessions: Arc<SessionUseCases>,
        state_ttl: Duration,
    ) -> Self {
        Self {
            identity,
            store,
            sessions,
            state_ttl,
        }
    }

    fn state_key(state: &str) -> String {
        format!("oauth_state:{state}")
    }

    /// Creates a single-use state value and the GitHub consent URL carrying it.
    #[instrument(skip(self))]
    pub async fn start(&self) -> AppResult<LoginStart> {
        let state = generate_state();
        self.store
            .set(&Self::state_key(&state), "pending", self.state_ttl)
            .await?;
        let auth_url = self.identity.authorize_url(&state)?;
        Ok(LoginStart { state, auth_url })
    }

    /// Consumes the state, exchanges the code and opens a session for the account.
    #[instrument(skip_all)]
    pub async fn complete(&self, code: &str, state: &str) -> AppResult<LoginOutcome> {
        if code.trim().is_empty() {
            return Err(AppError::InvalidInput("Missing authorization code".into()));
        }
        if state.trim().is_empty() {
            return Err(AppError::InvalidInput("Missing OAuth state".into()));
        }

        if self.store.take(&Self::state_key(state)).await?.is_none() {
            return Err(AppError::InvalidInput(
                "Invalid or expired OAuth state".into(),
            ));
        }

        let profile = self.identity.exchange_code(code).await?;
        let tokens = self.sessions.issue_session(&profile.subject()).await?;

        info!(github_id = profile.id, login = %profile.login, "GitHub login completed");
        Ok(LoginOutcome { profile, tokens })
    }
}

fn generate_state() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
