use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use time::Duration;
use tracing::{instrument, warn};

use crate::{
    app_error::{AppError, AppResult},
    application::credentials::CredentialCodec,
    domain::entities::credential_kind::CredentialKind,
};

/// Key-value store with per-key expiry.
///
/// Implementations report connectivity problems and timeouts as
/// `AppError::StoreUnavailable`.
#[async_trait]
pub trait ExpiringStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;
    async fn delete(&self, key: &str) -> AppResult<()>;
    /// Atomically reads and removes a key.
    async fn take(&self, key: &str) -> AppResult<Option<String>>;
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshedAccess {
    pub access_token: String,
    pub user_id: String,
}

#[derive(Clone)]
pub struct SessionUseCases {
    codec: CredentialCodec,
    store: Arc<dyn ExpiringStore>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl SessionUseCases {
    pub fn new(
        codec: CredentialCodec,
        store: Arc<dyn ExpiringStore>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            codec,
            store,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Mints an access/refresh pair for `subject`, replacing any previous session.
    #[instrument(skip(self))]
    pub async fn issue_session(&self, subject: &str) -> AppResult<SessionTokens> {
        let access_token = self
            .codec
            .encode(subject, CredentialKind::Access, self.access_ttl)?;
        let refresh_token = self
            .codec
            .encode(subject, CredentialKind::Refresh, self.refresh_ttl)?;

        let access_key = CredentialKind::Access.store_key(subject);
        let refresh_key = CredentialKind::Refresh.store_key(subject);

        self.store
            .set(&access_key, &access_token, self.access_ttl)
            .await?;

        if let Err(err) = self
            .store
            .set(&refresh_key, &refresh_token, self.refresh_ttl)
            .await
        {
            // Don't leave an access entry without its refresh counterpart.
            if let Err(cleanup) = self.store.delete(&access_key).await {
                warn!(error = %cleanup, "Failed to remove access entry after partial issuance");
            }
            return Err(err);
        }

        tracing::info!("Session issued");
        Ok(SessionTokens {
            access_token,
            refresh_token,
        })
    }

    /// Verifies any credential kind and returns its subject.
    pub fn verify(&self, token: &str) -> AppResult<String> {
        self.codec.decode(token).map(|credential| credential.subject)
    }

    /// Verifies a credential that may authorize API calls (access kind only).
    pub fn verify_access(&self, token: &str) -> AppResult<String> {
        let credential = self.codec.decode(token)?;
        if credential.kind != CredentialKind::Access {
            return Err(AppError::InvalidCredential(format!(
                "expected an access credential, got {}",
                credential.kind
            )));
        }
        Ok(credential.subject)
    }

    /// Mints a new access credential from the subject's current refresh credential.
    ///
    /// The refresh credential itself is left in place.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<RefreshedAccess> {
        let credential = self.codec.decode(refresh_token)?;
        if credential.kind != CredentialKind::Refresh {
            return Err(AppError::RefreshRejected);
        }
        let subject = credential.subject;

        let stored = self
            .store
            .get(&CredentialKind::Refresh.store_key(&subject))
            .await?;
        if stored.as_deref() != Some(refresh_token) {
            warn!(subject = %subject, "Refresh token does not match the live session");
            return Err(AppError::RefreshRejected);
        }

        let access_token = self
            .codec
            .encode(&subject, CredentialKind::Access, self.access_ttl)?;
        self.store
            .set(
                &CredentialKind::Access.store_key(&subject),
                &access_token,
                self.access_ttl,
            )
            .await?;

        tracing::info!(subject = %subject, "Access token refreshed");
        Ok(RefreshedAccess {
            access_token,
            user_id: subject,
        })
    }

    /// Ends the subject's session so its refresh credential is no longer honored.
    #[instrument(skip(self))]
    pub async fn revoke(&self, subject: &str) -> AppResult<()> {
        self.store
            .delete(&CredentialKind::Refresh.store_key(subject))
            .await?;
        self.store
            .delete(&CredentialKind::Access.store_key(subject))
            .await
    }

    /// Revokes the session `token` belongs to, provided it is still the live
    /// credential of its kind. Rotated-out tokens are `RefreshRejected`.
    #[instrument(skip_all)]
    pub async fn revoke_with(&self, token: &str) -> AppResult<String> {
        let credential = self.codec.decode(token)?;
        let subject = credential.subject;

        let stored = self
            .store
            .get(&credential.kind.store_key(&subject))
            .await?;
        if stored.as_deref() != Some(token) {
            warn!(subject = %subject, kind = %credential.kind, "Logout credential does not match the live session");
            return Err(AppError::RefreshRejected);
        }

        self.revoke(&subject).await?;
        tracing::info!(subject = %subject, "Session revoked");
        Ok(subject)
    }
}
