//! Password authentication against the hosted auth endpoint (`/auth/v1`)

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{error, info};

use super::AuthBackend;
use super::rest::rejection;
use crate::error::{BackendError, BackendResult};
use crate::models::AuthSession;

/// Client for the auth endpoint
#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl AuthClient {
    /// Create a new auth client
    pub fn new(http: Client, project_url: &str, anon_key: &str) -> Self {
        Self {
            http,
            base_url: format!("{}/auth/v1", project_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
        }
    }
}

#[async_trait]
impl AuthBackend for AuthClient {
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthSession> {
        info!("Signing in: {}", email);

        let response = self
            .http
            .post(format!("{}/token", self.base_url))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json::<AuthSession>().await?),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                let err = rejection(response).await;
                info!("Sign-in refused for {}: {}", email, err);
                Err(BackendError::InvalidCredentials)
            }
            _ => Err(rejection(response).await),
        }
    }

    async fn sign_out(&self, access_token: &str) -> BackendResult<()> {
        let response = self
            .http
            .post(format!("{}/logout", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = rejection(response).await;
            error!("Sign-out failed: {}", err);
            return Err(err);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_body_decodes() {
        let body = serde_json::json!({
            "access_token": "header.payload.signature",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1711630000,
            "refresh_token": "r3fr3sh",
            "user": {
                "id": "c5a1b0d2-5e7f-4f1a-9b3c-2d4e6f8a0b1c",
                "aud": "authenticated",
                "role": "authenticated",
                "email": "staff@example.com",
                "app_metadata": { "provider": "email" }
            }
        });

        let session: AuthSession = serde_json::from_value(body).expect("session body");
        assert_eq!(session.expires_in, 3600);
        assert_eq!(session.user.email.as_deref(), Some("staff@example.com"));
    }

    #[tokio::test]
    async fn test_sign_in_network_failure() {
        let client = AuthClient::new(Client::new(), "http://127.0.0.1:9", "anon");
        let result = client.sign_in("staff@example.com", "secret").await;
        assert!(matches!(result, Err(ref e) if e.is_network()));
    }
}
