use chrono::{Duration, Utc};
use serde::Deserialize;

use super::credential::Credential;
use super::error::AuthError;
use super::secrets::ClientSecrets;

const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Exchanges a stored refresh token for a new access token.
///
/// One form-encoded round trip to the provider's token endpoint. The
/// endpoint is injectable so tests can point at a mock server.
pub struct TokenRefresher {
    client: reqwest::Client,
    token_url: String,
}

impl Default for TokenRefresher {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenRefresher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Perform the refresh grant.
    ///
    /// The original refresh token is carried into the returned credential
    /// unless the provider rotated it; Google usually does not.
    pub async fn refresh(
        &self,
        secrets: &ClientSecrets,
        refresh_token: &str,
    ) -> Result<Credential, AuthError> {
        let resp = self
            .client
            .post(&self.token_url)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", secrets.client_id.as_str()),
                ("client_secret", secrets.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(AuthError::RefreshRejected {
                status: status.as_u16(),
                detail,
            });
        }
        let payload: RefreshResponse = resp.json().await?;
        let Some(access_token) = payload.access_token else {
            return Err(AuthError::InvalidResponse(
                "token endpoint response missing access_token".to_string(),
            ));
        };
        let expires_at = payload
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));
        Ok(Credential {
            access_token,
            refresh_token: payload
                .refresh_token
                .or_else(|| Some(refresh_token.to_string())),
            expires_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}
