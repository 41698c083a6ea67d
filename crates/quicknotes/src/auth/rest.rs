use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::BackendSettings;
use crate::error::{CoreError, CoreResult};
use crate::note::UserId;

use super::{AuthClient, Session};

/// Auth client for the hosted backend's `/auth/v1` endpoints.
#[derive(Clone)]
pub struct RestAuthClient {
    client: Client,
    settings: BackendSettings,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    #[serde(default, alias = "error_description", alias = "msg")]
    message: Option<String>,
}

impl RestAuthClient {
    pub fn new(client: Client, settings: BackendSettings) -> Self {
        Self { client, settings }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.settings.url)
    }
}

#[async_trait]
impl AuthClient for RestAuthClient {
    async fn exchange_code(&self, code: &str, code_verifier: Option<&str>) -> CoreResult<Session> {
        let response = self
            .client
            .post(self.endpoint("token"))
            .query(&[("grant_type", "pkce")])
            .header("apikey", &self.settings.anon_key)
            .json(&json!({ "auth_code": code, "code_verifier": code_verifier }))
            .send()
            .await
            .map_err(|e| CoreError::Unauthorized(format!("code exchange failed: {e}")))?;

        if !response.status().is_success() {
            return Err(CoreError::Unauthorized(error_message(response).await));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Unauthorized(format!("malformed token response: {e}")))?;
        Ok(Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_in: token.expires_in,
            user_id: UserId::new(token.user.id),
        })
    }

    async fn user_for_token(&self, access_token: &str) -> CoreResult<UserId> {
        let response = self
            .client
            .get(self.endpoint("user"))
            .header("apikey", &self.settings.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| CoreError::Unauthorized(format!("user lookup failed: {e}")))?;

        if !response.status().is_success() {
            return Err(CoreError::Unauthorized(error_message(response).await));
        }

        let user: AuthUser = response
            .json()
            .await
            .map_err(|e| CoreError::Unauthorized(format!("malformed user response: {e}")))?;
        Ok(UserId::new(user.id))
    }

    async fn sign_out(&self, access_token: &str) -> CoreResult<()> {
        let response = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", &self.settings.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| CoreError::Unauthorized(format!("sign out failed: {e}")))?;

        if !response.status().is_success() {
            return Err(CoreError::Unauthorized(error_message(response).await));
        }
        Ok(())
    }
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<AuthErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.message)
        .unwrap_or_else(|| format!("auth service returned {status}"))
}
