use std::{net::SocketAddr, str::FromStr};

use axum::http::HeaderValue;
use env_helpers::get_env_default;
use secrecy::SecretString;
use time::Duration;
use url::Url;

use crate::infra::error::InfraError;

pub struct AppConfig {
    pub jwt_secret: SecretString,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub github_client_id: String,
    pub github_client_secret: SecretString,
    /// Forwarded as `redirect_uri` on the authorize URL when set.
    pub github_redirect_uri: Option<Url>,
    /// Service token used to read pull requests and post comments.
    pub github_token: SecretString,
    pub gemini_api_key: SecretString,
    pub gemini_model: String,
    pub github_api_base: Url,
    pub github_oauth_base: Url,
    pub gemini_api_base: Url,
    pub redis_url: String,
    pub redis_timeout: std::time::Duration,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    pub cookie_secure: bool,
    pub oauth_state_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        let jwt_secret = secret("JWT_SECRET_KEY")?;

        let access_token_ttl = ttl(
            "ACCESS_TOKEN_TTL_SECS",
            parsed_or("ACCESS_TOKEN_TTL_SECS", 86_400)?,
            Duration::SECOND,
        )?;
        let refresh_token_ttl = ttl(
            "REFRESH_TOKEN_TTL_DAYS",
            parsed_or("REFRESH_TOKEN_TTL_DAYS", 30)?,
            Duration::DAY,
        )?;
        let oauth_state_ttl = ttl(
            "OAUTH_STATE_TTL_MINUTES",
            parsed_or("OAUTH_STATE_TTL_MINUTES", 10)?,
            Duration::MINUTE,
        )?;
        let redis_timeout = timeout_ms("REDIS_TIMEOUT_MS", parsed_or("REDIS_TIMEOUT_MS", 2_000)?)?;

        let github_client_id: String = required("CLIENT_ID")?;
        let github_client_secret = secret("CLIENT_SECRETS")?;
        let github_redirect_uri: Option<Url> = optional("GITHUB_REDIRECT_URI")?;
        let github_token = secret("TOKEN")?;
        let gemini_api_key = secret("GEMINI_API_KEY")?;
        let gemini_model: String = get_env_default("GEMINI_MODEL", "gemini-2.0-flash".to_string());

        let github_api_base = url_or("GITHUB_API_BASE", "https://api.github.com")?;
        let github_oauth_base = url_or("GITHUB_OAUTH_BASE", "https://github.com")?;
        let gemini_api_base = url_or(
            "GEMINI_API_BASE",
            "https://generativelanguage.googleapis.com",
        )?;

        let redis_url: String = get_env_default("REDIS_URL", "redis://127.0.0.1:6379".to_string());
        let bind_addr: SocketAddr = parsed_or("BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 8000)))?;
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:5173"))
                .parse()
                .map_err(|_| InfraError::ConfigInvalid { var: "CORS_ORIGIN" })?;
        let cookie_secure: bool = parsed_or("COOKIE_SECURE", true)?;

        Ok(Self {
            jwt_secret,
            access_token_ttl,
            refresh_token_ttl,
            github_client_id,
            github_client_secret,
            github_redirect_uri,
            github_token,
            gemini_api_key,
            gemini_model,
            github_api_base,
            github_oauth_base,
            gemini_api_base,
            redis_url,
            redis_timeout,
            bind_addr,
            cors_origin,
            cookie_secure,
            oauth_state_ttl,
        })
    }
}

/// Longest lifetime accepted for any credential or state entry.
const MAX_TTL: Duration = Duration::days(3_650);

/// `amount` units as a positive duration no longer than `MAX_TTL`.
fn ttl(var: &'static str, amount: i64, unit: Duration) -> Result<Duration, InfraError> {
    let invalid = || InfraError::ConfigInvalid { var };
    if amount <= 0 {
        return Err(invalid());
    }
    i32::try_from(amount)
        .ok()
        .and_then(|factor| unit.checked_mul(factor))
        .filter(|d| *d <= MAX_TTL)
        .ok_or_else(invalid)
}

fn timeout_ms(var: &'static str, ms: u64) -> Result<std::time::Duration, InfraError> {
    if ms == 0 {
        return Err(InfraError::ConfigInvalid { var });
    }
    Ok(std::time::Duration::from_millis(ms))
}

fn optional<T: FromStr>(var: &'static str) -> Result<Option<T>, InfraError> {
    match std::env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| InfraError::ConfigInvalid { var }),
        _ => Ok(None),
    }
}

fn required<T: FromStr>(var: &'static str) -> Result<T, InfraError> {
    optional(var)?.ok_or(InfraError::ConfigMissing { var })
}

fn parsed_or<T: FromStr>(var: &'static str, default: T) -> Result<T, InfraError> {
    Ok(optional(var)?.unwrap_or(default))
}

fn url_or(var: &'static str, default: &str) -> Result<Url, InfraError> {
    let raw: String = get_env_default(var, default.to_string());
    Url::parse(&raw).map_err(|_| InfraError::ConfigInvalid { var })
}

fn secret(var: &'static str) -> Result<SecretString, InfraError> {
    required::<String>(var).map(|raw| SecretString::new(raw.into()))
}
