use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::{github_login::GithubLoginUseCases, review::ReviewUseCases, session::SessionUseCases},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub session_use_cases: Arc<SessionUseCases>,
    pub login_use_cases: Arc<GithubLoginUseCases>,
    pub review_use_cases: Arc<ReviewUseCases>,
}
