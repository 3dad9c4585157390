use async_trait::async_trait;
use std::sync::Mutex;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::github_login::{GithubProfile, IdentityProvider},
};

pub fn github_profile(id: u64, login: &str) -> GithubProfile {
    GithubProfile {
        id,
        login: login.to_string(),
        name: Some("Test User".to_string()),
        email: Some(format!("{login}@example.com")),
        avatar_url: None,
        html_url: Some(format!("https://github.com/{login}")),
    }
}

/// Identity provider that accepts any code for a fixed profile, or rejects every code.
pub struct StubIdentityProvider {
    profile: Option<GithubProfile>,
    codes: Mutex<Vec<String>>,
}

impl StubIdentityProvider {
    pub fn user(id: u64, login: &str) -> Self {
        Self {
            profile: Some(github_profile(id, login)),
            codes: Mutex::new(Vec::new()),
        }
    }

    /// Behaves like GitHub answering `bad_verification_code`.
    pub fn rejecting() -> Self {
        Self {
            profile: None,
            codes: Mutex::new(Vec::new()),
        }
    }

    pub fn exchanged_codes(&self) -> Vec<String> {
        self.codes.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    fn authorize_url(&self, state: &str) -> AppResult<String> {
        Ok(format!(
            "https://github.com/login/oauth/authorize?client_id=test-client&state={state}"
        ))
    }

    async fn exchange_code(&self, code: &str) -> AppResult<GithubProfile> {
        self.codes.lock().unwrap().push(code.to_string());
        self.profile.clone().ok_or_else(|| {
            AppError::InvalidInput("Authorization code expired or already used".into())
        })
    }
}
