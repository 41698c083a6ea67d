//! Session exchange with the hosted auth service.

pub mod rest;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::note::UserId;

pub use rest::RestAuthClient;

/// Name of the cookie carrying the access token after a successful callback.
pub const SESSION_COOKIE: &str = "quicknotes-session";
/// Name of the cookie the login page stores the PKCE verifier in.
pub const CODE_VERIFIER_COOKIE: &str = "quicknotes-code-verifier";

/// A session returned by the auth service for an exchanged code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub user_id: UserId,
}

/// The authenticated caller every store query is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub user_id: UserId,
    /// Forwarded to the store so its row-level policy sees the same user.
    pub access_token: Option<String>,
}

impl Owner {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            access_token: None,
        }
    }

    pub fn with_token(user_id: UserId, access_token: impl Into<String>) -> Self {
        Self {
            user_id,
            access_token: Some(access_token.into()),
        }
    }
}

impl From<&Session> for Owner {
    fn from(session: &Session) -> Self {
        Owner::with_token(session.user_id.clone(), session.access_token.clone())
    }
}

#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Trades an authorization code for a session.
    async fn exchange_code(&self, code: &str, code_verifier: Option<&str>) -> CoreResult<Session>;
    /// Resolves an access token to the user it was issued for.
    async fn user_for_token(&self, access_token: &str) -> CoreResult<UserId>;
    /// Revokes the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> CoreResult<()>;
}

pub type SharedAuthClient = Arc<dyn AuthClient>;

const LOCAL_TOKEN_PREFIX: &str = "local:";

/// Single-user auth for local mode: every code signs in the configured user.
#[derive(Debug, Clone)]
pub struct StaticAuthClient {
    user_id: UserId,
}

impl StaticAuthClient {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl AuthClient for StaticAuthClient {
    async fn exchange_code(&self, code: &str, _code_verifier: Option<&str>) -> CoreResult<Session> {
        if code.trim().is_empty() {
            return Err(CoreError::Unauthorized("empty authorization code".to_string()));
        }
        Ok(Session {
            access_token: format!("{LOCAL_TOKEN_PREFIX}{code}"),
            refresh_token: None,
            expires_in: None,
            user_id: self.user_id.clone(),
        })
    }

    async fn user_for_token(&self, access_token: &str) -> CoreResult<UserId> {
        if access_token.starts_with(LOCAL_TOKEN_PREFIX) {
            Ok(self.user_id.clone())
        } else {
            Err(CoreError::Unauthorized("unknown access token".to_string()))
        }
    }

    async fn sign_out(&self, _access_token: &str) -> CoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_client_issues_tokens_it_accepts() {
        let auth = StaticAuthClient::new(UserId::new("local-user"));
        let session = auth.exchange_code("abc", None).await.expect("exchange");
        let user = auth
            .user_for_token(&session.access_token)
            .await
            .expect("resolve");
        assert_eq!(user, UserId::new("local-user"));
    }

    #[tokio::test]
    async fn static_client_rejects_foreign_tokens_and_empty_codes() {
        let auth = StaticAuthClient::new(UserId::new("local-user"));
        assert!(matches!(
            auth.user_for_token("eyJhbGciOi").await,
            Err(CoreError::Unauthorized(_))
        ));
        assert!(auth.exchange_code(" ", None).await.is_err());
    }

    #[test]
    fn owner_from_session_forwards_token() {
        let session = Session {
            access_token: "tok".to_string(),
            refresh_token: None,
            expires_in: Some(3600),
            user_id: UserId::new("u1"),
        };
        let owner = Owner::from(&session);
        assert_eq!(owner.access_token.as_deref(), Some("tok"));
        assert_eq!(owner.user_id, UserId::new("u1"));
    }
}
