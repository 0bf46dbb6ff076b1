//! Environment-driven configuration.

use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::store::default_tubetool_dir;
use crate::auth::{
    ClientSecrets, CredentialManager, FileCredentialStore, InteractiveAuthorizer,
};
use crate::error::{Result, TubetoolError};
use crate::generation::GenerationClient;

const DEFAULT_GENERATION_BASE_URL: &str = "https://api.goapi.ai/api/v1/task";

/// Runtime configuration resolved from the environment.
///
/// Resolution order: explicit env var, then the crate's defaults under
/// `~/.tubetool`. A `.env` file is honored when present.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the OAuth client secrets JSON.
    pub client_secrets_path: PathBuf,
    /// Path to the persisted credential record.
    pub credential_path: PathBuf,
    /// Static API key for the generation task endpoints.
    pub generation_api_key: Option<String>,
    /// Base URL for the generation task endpoints.
    pub generation_base_url: String,
    /// Host the OAuth redirect URI points at.
    pub redirect_host: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Recognized variables: `TUBETOOL_CLIENT_SECRETS`,
    /// `TUBETOOL_CREDENTIAL_FILE`, `GENERATION_API_KEY`,
    /// `GENERATION_BASE_URL`, `OAUTH_REDIRECT_HOST`.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let base_dir = default_tubetool_dir();
        Self {
            client_secrets_path: std::env::var("TUBETOOL_CLIENT_SECRETS")
                .map(PathBuf::from)
                .unwrap_or_else(|_| base_dir.join("client_secret.json")),
            credential_path: std::env::var("TUBETOOL_CREDENTIAL_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| base_dir.join("token.json")),
            generation_api_key: std::env::var("GENERATION_API_KEY").ok(),
            generation_base_url: std::env::var("GENERATION_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GENERATION_BASE_URL.to_string()),
            redirect_host: std::env::var("OAUTH_REDIRECT_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
        }
    }

    /// The generation API key, or a configuration error naming the variable.
    pub fn require_generation_api_key(&self) -> Result<&str> {
        self.generation_api_key
            .as_deref()
            .ok_or_else(|| TubetoolError::Configuration("GENERATION_API_KEY is not set".to_string()))
    }

    /// Build the credential manager wired to the configured paths and
    /// redirect host.
    pub fn credential_manager(&self) -> Result<CredentialManager> {
        let secrets = ClientSecrets::load(&self.client_secrets_path)?;
        let store = Arc::new(FileCredentialStore::new(self.credential_path.clone()));
        let authorizer =
            InteractiveAuthorizer::new().with_redirect_host(self.redirect_host.clone());
        Ok(CredentialManager::new(store, secrets).with_interactive(Arc::new(authorizer)))
    }

    /// Build the generation client for the configured task endpoints.
    pub fn generation_client(&self) -> Result<GenerationClient> {
        let api_key = self.require_generation_api_key()?.to_string();
        Ok(GenerationClient::new(
            self.generation_base_url.clone(),
            api_key,
        ))
    }
}
