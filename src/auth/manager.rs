use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::credential::Credential;
use super::error::AuthError;
use super::interactive::InteractiveAuthorizer;
use super::refresh::TokenRefresher;
use super::secrets::ClientSecrets;
use super::store::CredentialStore;

/// Seam for the interactive authorization step, so the manager can be
/// exercised without a browser or a listening port.
#[async_trait]
pub trait InteractiveFlow: Send + Sync {
    async fn authorize(&self, secrets: &ClientSecrets) -> Result<Credential, AuthError>;
}

#[async_trait]
impl InteractiveFlow for InteractiveAuthorizer {
    async fn authorize(&self, secrets: &ClientSecrets) -> Result<Credential, AuthError> {
        InteractiveAuthorizer::authorize(self, secrets).await
    }
}

/// Decides, per call, whether the stored credential is reused, refreshed,
/// or replaced through interactive authorization.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use tubetool::auth::{ClientSecrets, CredentialManager, FileCredentialStore};
///
/// # async fn example() -> Result<(), tubetool::auth::AuthError> {
/// let secrets = ClientSecrets::load("client_secret.json")?;
/// let manager = CredentialManager::new(Arc::new(FileCredentialStore::new_default()), secrets);
/// let credential = manager.obtain_valid_credential().await?;
/// # Ok(())
/// # }
/// ```
pub struct CredentialManager {
    store: Arc<dyn CredentialStore>,
    secrets: ClientSecrets,
    refresher: TokenRefresher,
    interactive: Arc<dyn InteractiveFlow>,
}

impl CredentialManager {
    pub fn new(store: Arc<dyn CredentialStore>, secrets: ClientSecrets) -> Self {
        Self {
            store,
            secrets,
            refresher: TokenRefresher::new(),
            interactive: Arc::new(InteractiveAuthorizer::new()),
        }
    }

    pub fn with_refresher(mut self, refresher: TokenRefresher) -> Self {
        self.refresher = refresher;
        self
    }

    pub fn with_interactive(mut self, interactive: Arc<dyn InteractiveFlow>) -> Self {
        self.interactive = interactive;
        self
    }

    /// Produce a credential that is safe to attach to a request.
    ///
    /// Cache hit (stored credential with absent or future expiry) makes no
    /// network calls and no store writes. An expired credential gets one
    /// refresh attempt; a refresh failure is absorbed and the flow falls
    /// back to interactive authorization, whose failure is the call's
    /// failure. At most one store write happens per call.
    pub async fn obtain_valid_credential(&self) -> Result<Credential, AuthError> {
        if let Some(stored) = self.store.load()? {
            if !stored.is_expired(Utc::now()) {
                tracing::debug!("stored credential still valid, reusing");
                return Ok(stored);
            }
            if let Some(refresh_token) = stored.refresh_token.as_deref() {
                match self.refresher.refresh(&self.secrets, refresh_token).await {
                    Ok(refreshed) => {
                        self.store.save(&refreshed)?;
                        tracing::info!("access token refreshed");
                        return Ok(refreshed);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "token refresh failed, falling back to interactive authorization");
                    }
                }
            } else {
                tracing::warn!("stored credential expired with no refresh token");
            }
        }

        let credential = self.interactive.authorize(&self.secrets).await?;
        self.store.save(&credential)?;
        tracing::info!("interactive authorization complete, credential persisted");
        Ok(credential)
    }
}
