use async_trait::async_trait;
use reqwest::{Client, header};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{error, instrument};
use url::Url;

use super::{API_VERSION, SERVICE, endpoint};
use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::github_login::{GithubProfile, IdentityProvider},
    infra::http_client::{expect_success, transport_error},
};

/// GitHub OAuth app: authorize URL, code exchange and `GET /user`.
pub struct GithubOAuthClient {
    http: Client,
    oauth_base: Url,
    api_base: Url,
    client_id: String,
    client_secret: SecretString,
    redirect_uri: Option<Url>,
}

/// GitHub answers 200 for both outcomes of the code exchange.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl GithubOAuthClient {
    pub fn new(
        http: Client,
        oauth_base: Url,
        api_base: Url,
        client_id: String,
        client_secret: SecretString,
        redirect_uri: Option<Url>,
    ) -> Self {
        Self {
            http,
            oauth_base,
            api_base,
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    async fn exchange_for_token(&self, code: &str) -> AppResult<SecretString> {
        let mut body = serde_json::json!({
            "client_id": self.client_id,
            "client_secret": self.client_secret.expose_secret(),
            "code": code,
        });
        if let Some(redirect_uri) = &self.redirect_uri {
            body["redirect_uri"] = serde_json::Value::String(redirect_uri.to_string());
        }

        let resp = self
            .http
            .post(endpoint(&self.oauth_base, "login/oauth/access_token"))
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;
        let resp = expect_success(SERVICE, resp).await?;

        let token: TokenResponse = resp.json().await.map_err(|e| AppError::Upstream {
            service: SERVICE,
            status: 502,
            message: format!("Failed to parse token response: {e}"),
        })?;

        match (token.access_token, token.error) {
            (_, Some(error)) => {
                let detail = token.error_description.unwrap_or_default();
                error!(error = %error, detail = %detail, "GitHub rejected the authorization code");
                if error == "bad_verification_code" {
                    Err(AppError::InvalidInput(
                        "Authorization code expired or already used".into(),
                    ))
                } else {
                    Err(AppError::InvalidInput(format!(
                        "GitHub OAuth error: {error}"
                    )))
                }
            }
            (Some(access_token), None) if !access_token.is_empty() => {
                Ok(SecretString::new(access_token.into()))
            }
            _ => Err(AppError::Upstream {
                service: SERVICE,
                status: 502,
                message: "token response carried no access_token".into(),
            }),
        }
    }

    async fn fetch_profile(&self, token: &SecretString) -> AppResult<GithubProfile> {
        let resp = self
            .http
            .get(endpoint(&self.api_base, "user"))
            .header(
                header::AUTHORIZATION,
                format!("token {}", token.expose_secret()),
            )
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;
        let resp = expect_success(SERVICE, resp).await?;

        resp.json::<GithubProfile>()
            .await
            .map_err(|e| AppError::Upstream {
                service: SERVICE,
                status: 502,
                message: format!("Failed to parse user profile: {e}"),
            })
    }
}

#[async_trait]
impl IdentityProvider for GithubOAuthClient {
    fn authorize_url(&self, state: &str) -> AppResult<String> {
        let mut url = Url::parse(&endpoint(&self.oauth_base, "login/oauth/authorize"))
            .map_err(|e| AppError::Configuration(format!("Invalid GitHub OAuth base: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.client_id)
                .append_pair("scope", "read:user user:email")
                .append_pair("state", state);
            if let Some(redirect_uri) = &self.redirect_uri {
                query.append_pair("redirect_uri", redirect_uri.as_str());
            }
        }
        Ok(url.to_string())
    }

    #[instrument(skip_all)]
    async fn exchange_code(&self, code: &str) -> AppResult<GithubProfile> {
        let token = self.exchange_for_token(code).await?;
        self.fetch_profile(&token).await
    }
}
