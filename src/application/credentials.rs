//! Signed session credentials (HS256 JWTs).
//!
//! Tokens carry `{sub, exp, iat, jti, type}`. The `jti` is a random nonce so
//! two credentials minted for the same subject in the same second still differ.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::domain::entities::credential_kind::CredentialKind;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub jti: String,
    /// Absent on access tokens minted by older deployments.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CredentialKind>,
}

/// A verified credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub subject: String,
    pub kind: CredentialKind,
    pub expires_at: OffsetDateTime,
    pub id: String,
}

#[derive(Clone)]
pub struct CredentialCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl CredentialCodec {
    /// Builds the signing and verification keys once from the shared secret.
    pub fn new(secret: &SecretString) -> AppResult<Self> {
        let raw = secret.expose_secret();
        if raw.trim().is_empty() {
            return Err(AppError::Configuration(
                "credential signing secret is not configured".into(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(raw.as_bytes()),
            decoding: DecodingKey::from_secret(raw.as_bytes()),
            validation,
        })
    }

    pub fn encode(&self, subject: &str, kind: CredentialKind, ttl: Duration) -> AppResult<String> {
        if subject.is_empty() {
            return Err(AppError::InvalidInput("credential subject is empty".into()));
        }
        if !ttl.is_positive() {
            return Err(AppError::Internal(format!(
                "credential ttl must be positive, got {ttl}"
            )));
        }

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            exp: now + ttl.whole_seconds(),
            iat: now,
            jti: Uuid::new_v4().to_string(),
            kind: Some(kind),
        };
        self.encode_claims(&claims)
    }

    pub(crate) fn encode_claims(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign credential: {e}")))
    }

    pub fn decode(&self, token: &str) -> AppResult<Credential> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::ExpiredCredential,
                _ => AppError::InvalidCredential(e.to_string()),
            })?;

        if claims.sub.is_empty() {
            return Err(AppError::InvalidCredential("empty subject".into()));
        }

        let expires_at = OffsetDateTime::from_unix_timestamp(claims.exp)
            .map_err(|e| AppError::InvalidCredential(format!("exp out of range: {e}")))?;

        Ok(Credential {
            subject: claims.sub,
            kind: claims.kind.unwrap_or(CredentialKind::Access),
            expires_at,
            id: claims.jti,
        })
    }
}
