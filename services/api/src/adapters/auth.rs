//! services/api/src/adapters/auth.rs
//!
//! The auth adapter: implements the `AuthService` port against a hosted
//! GoTrue-style credential backend. The OAuth authorization-code flow lives
//! entirely on the provider's side; this adapter only builds the redirect
//! URL, exchanges the one-time code, resolves tokens to a principal and
//! terminates sessions.

use async_trait::async_trait;
use notes_core::domain::{Principal, SessionTokens};
use notes_core::ports::{AuthService, PortError, PortResult};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// An auth adapter speaking the GoTrue HTTP API.
#[derive(Clone)]
pub struct GoTrueAuthAdapter {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl GoTrueAuthAdapter {
    pub fn new(client: reqwest::Client, base_url: String, anon_key: String) -> Self {
        Self {
            client,
            base_url,
            anon_key,
        }
    }
}

#[derive(Deserialize)]
struct UserResponse {
    id: Uuid,
    email: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: u64,
}

#[async_trait]
impl AuthService for GoTrueAuthAdapter {
    async fn resolve_principal(&self, access_token: &str) -> PortResult<Option<Principal>> {
        let response = self
            .client
            .get(format!("{}/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        match response.status() {
            // A rejected or expired token is an anonymous caller, not an error.
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let user: UserResponse = response
                    .json()
                    .await
                    .map_err(|e| PortError::Unexpected(e.to_string()))?;
                Ok(Some(Principal {
                    id: user.id,
                    email: user.email,
                }))
            }
            status => Err(PortError::Unexpected(format!(
                "auth backend returned status {}",
                status
            ))),
        }
    }

    async fn sign_in_url(&self, origin: &str) -> PortResult<String> {
        Ok(format!(
            "{}/authorize?provider=google&redirect_to={}/auth/callback",
            self.base_url, origin
        ))
    }

    async fn exchange_code(&self, code: &str) -> PortResult<SessionTokens> {
        let response = self
            .client
            .post(format!(
                "{}/token?grant_type=authorization_code",
                self.base_url
            ))
            .header("apikey", &self.anon_key)
            .json(&json!({ "auth_code": code }))
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::BAD_REQUEST {
            return Err(PortError::Unauthorized);
        }
        if !status.is_success() {
            return Err(PortError::Unexpected(format!(
                "code exchange failed with status {}",
                status
            )));
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(SessionTokens {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
        })
    }

    async fn sign_out(&self, access_token: &str) -> PortResult<()> {
        let response = self
            .client
            .post(format!("{}/logout", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let status = response.status();
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            // An already-dead session is as signed out as it gets.
            Ok(())
        } else {
            Err(PortError::Unexpected(format!(
                "sign-out failed with status {}",
                status
            )))
        }
    }
}
