//! Gemini `generateContent` client used to draft review comments.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::review::ReviewGenerator,
    infra::http_client::{expect_success, transport_error},
};

const SERVICE: &str = "gemini";

pub struct GeminiClient {
    http: Client,
    api_base: Url,
    model: String,
    api_key: SecretString,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

impl GeminiClient {
    pub fn new(http: Client, api_base: Url, model: String, api_key: SecretString) -> Self {
        Self {
            http,
            api_base,
            model,
            api_key,
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.as_str().trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl ReviewGenerator for GeminiClient {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn generate(&self, system_prompt: &str, changes: &str) -> AppResult<String> {
        let request = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_prompt,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: changes }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "text/plain",
            },
        };

        let resp = self
            .http
            .post(self.generate_url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;
        let resp = expect_success(SERVICE, resp).await?;

        let parsed: GenerateResponse = resp.json().await.map_err(|e| AppError::Upstream {
            service: SERVICE,
            status: 502,
            message: format!("Failed to parse response: {e}"),
        })?;

        let text = parsed.text().ok_or_else(|| AppError::Upstream {
            service: SERVICE,
            status: 502,
            message: "response contained no text".into(),
        })?;
        debug!(chars = text.len(), "Review generated");
        Ok(text)
    }
}
