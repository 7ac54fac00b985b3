use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, Secret};
use uuid::Uuid;

/// Verifies access tokens against the hosted auth provider.
#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    http_client: reqwest::Client,
    api_key: Secret<String>,
    timeout: Duration,
}

/// The user an access token belongs to.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum AuthClientError {
    #[error("The access token was rejected.")]
    Rejected,
    #[error("Failed to reach the auth provider.")]
    Unreachable(#[from] reqwest::Error),
}

impl AuthClient {
    pub fn new(base_url: String, api_key: Secret<String>, timeout: Duration) -> Self {
        Self {
            base_url,
            http_client: reqwest::Client::new(),
            api_key,
            timeout,
        }
    }

    #[tracing::instrument(name = "Verifying access token", skip(self, access_token))]
    pub async fn get_user(&self, access_token: &str) -> Result<AuthenticatedUser, AuthClientError> {
        let response = self
            .http_client
            .get(format!("{}/auth/v1/user", self.base_url))
            .timeout(self.timeout)
            .bearer_auth(access_token)
            .header("apikey", self.api_key.expose_secret())
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(AuthClientError::Rejected);
        }

        let user = response.error_for_status()?.json().await?;
        Ok(user)
    }
}
