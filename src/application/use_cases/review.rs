use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    app_error::{AppError, AppResult},
    application::review_prompt::{REVIEW_SYSTEM_PROMPT, render_changes},
    domain::entities::repository::RepoRef,
};

/// One changed file of a pull request, as listed by the code host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestFile {
    pub filename: String,
    pub status: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub changes: u64,
    /// Missing for binary files and very large diffs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,
}

#[async_trait]
pub trait PullRequestHost: Send + Sync {
    async fn list_files(&self, repo: &RepoRef, number: u64) -> AppResult<Vec<PullRequestFile>>;
    async fn post_comment(&self, repo: &RepoRef, number: u64, body: &str) -> AppResult<()>;
}

#[async_trait]
pub trait ReviewGenerator: Send + Sync {
    async fn generate(&self, system_prompt: &str, changes: &str) -> AppResult<String>;
}

#[derive(Clone)]
pub struct ReviewUseCases {
    host: Arc<dyn PullRequestHost>,
    generator: Arc<dyn ReviewGenerator>,
}

impl ReviewUseCases {
    pub fn new(host: Arc<dyn PullRequestHost>, generator: Arc<dyn ReviewGenerator>) -> Self {
        Self { host, generator }
    }

    /// Fetches the pull request's changed files and asks the model for a review comment.
    #[instrument(skip(self))]
    pub async fn draft_comment(&self, repo_url: &str, number: u64) -> AppResult<String> {
        let repo = RepoRef::parse(repo_url)?;
        validate_number(number)?;

        let files = self.host.list_files(&repo, number).await?;
        if files.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Pull request #{number} in {repo} has no changed files"
            )));
        }
        info!(repo = %repo, number, files = files.len(), "Changes fetched, generating comment");

        let comment = self
            .generator
            .generate(REVIEW_SYSTEM_PROMPT, &render_changes(&repo, number, &files))
            .await?;
        if comment.trim().is_empty() {
            return Err(AppError::Upstream {
                service: "review generator",
                status: 502,
                message: "model returned an empty comment".into(),
            });
        }
        Ok(comment)
    }

    #[instrument(skip(self, text))]
    pub async fn post_comment(&self, repo_url: &str, number: u64, text: &str) -> AppResult<()> {
        let repo = RepoRef::parse(repo_url)?;
        validate_number(number)?;
        if text.trim().is_empty() {
            return Err(AppError::InvalidInput("Comment text is empty".into()));
        }

        self.host.post_comment(&repo, number, text).await?;
        info!(repo = %repo, number, "Comment posted");
        Ok(())
    }
}

fn validate_number(number: u64) -> AppResult<()> {
    if number == 0 {
        return Err(AppError::InvalidInput(
            "Pull request number must be positive".into(),
        ));
    }
    Ok(())
}
