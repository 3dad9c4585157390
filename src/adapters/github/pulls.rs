use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, header};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

use super::{API_VERSION, SERVICE, endpoint};
use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::review::{PullRequestFile, PullRequestHost},
    domain::entities::repository::RepoRef,
    infra::http_client::{expect_success, transport_error},
};

const PER_PAGE: usize = 100;
/// GitHub stops listing after 3000 files.
const MAX_PAGES: u32 = 30;

/// REST client for pull request files and issue comments, authenticated with the service token.
pub struct GithubPullRequestClient {
    http: Client,
    api_base: Url,
    token: SecretString,
}

impl GithubPullRequestClient {
    pub fn new(http: Client, api_base: Url, token: SecretString) -> Self {
        Self {
            http,
            api_base,
            token,
        }
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(self.token.expose_secret())
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }
}

#[async_trait]
impl PullRequestHost for GithubPullRequestClient {
    #[instrument(skip(self), fields(repo = %repo))]
    async fn list_files(&self, repo: &RepoRef, number: u64) -> AppResult<Vec<PullRequestFile>> {
        let url = endpoint(
            &self.api_base,
            &format!("repos/{}/{}/pulls/{number}/files", repo.owner, repo.name),
        );

        let mut files = Vec::new();
        for page in 1..=MAX_PAGES {
            let resp = self
                .authorized(self.http.get(&url))
                .query(&[("per_page", PER_PAGE.to_string()), ("page", page.to_string())])
                .send()
                .await
                .map_err(|e| transport_error(SERVICE, e))?;
            let resp = expect_success(SERVICE, resp).await?;

            let batch: Vec<PullRequestFile> =
                resp.json().await.map_err(|e| AppError::Upstream {
                    service: SERVICE,
                    status: 502,
                    message: format!("Failed to parse pull request files: {e}"),
                })?;
            let last = batch.len() < PER_PAGE;
            files.extend(batch);
            if last {
                break;
            }
        }

        debug!(count = files.len(), "Fetched pull request files");
        Ok(files)
    }

    #[instrument(skip(self, body), fields(repo = %repo))]
    async fn post_comment(&self, repo: &RepoRef, number: u64, body: &str) -> AppResult<()> {
        let url = endpoint(
            &self.api_base,
            &format!("repos/{}/{}/issues/{number}/comments", repo.owner, repo.name),
        );

        let resp = self
            .authorized(self.http.post(&url))
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;
        let resp = expect_success(SERVICE, resp).await?;

        if resp.status() != StatusCode::CREATED {
            return Err(AppError::Upstream {
                service: SERVICE,
                status: 502,
                message: format!("expected 201 Created, got {}", resp.status()),
            });
        }
        Ok(())
    }
}
