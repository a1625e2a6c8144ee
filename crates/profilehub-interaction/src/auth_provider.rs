//! HttpAuthProvider - REST client for the authentication service.
//!
//! Endpoints (relative to the gateway base URL):
//! - `POST /auth/register` → `201 {message}` or `4xx {error}`
//! - `POST /auth/login` → `200 {token, username}` or `4xx {error}`

use crate::http::{build_client, ensure_success, error_text, join_url, read_json, send_error};
use async_trait::async_trait;
use profilehub_core::auth::{AuthProvider, AuthSession, RegisterOutcome};
use profilehub_core::{ProfileError, Result};
use profilehub_infrastructure::ClientConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::RwLock;

const DEFAULT_REGISTER_MESSAGE: &str = "Registration successful";

/// Auth client that also holds the session issued by the last login.
pub struct HttpAuthProvider {
    client: Client,
    base_url: String,
    session: RwLock<Option<AuthSession>>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    message: Option<String>,
}

impl HttpAuthProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
            session: RwLock::new(None),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.api_url.clone(), config.request_timeout())
    }

    /// The session from the last successful login, if not logged out since.
    pub async fn current_session(&self) -> Option<AuthSession> {
        self.session.read().await.clone()
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn register(&self, username: &str, password: &str) -> Result<RegisterOutcome> {
        let context = "POST /auth/register";
        let response = self
            .client
            .post(join_url(&self.base_url, "auth/register"))
            .json(&Credentials { username, password })
            .send()
            .await
            .map_err(|e| send_error(context, e))?;

        let status = response.status();
        if status.is_client_error() {
            let reason = error_text(response).await;
            tracing::info!("Registration of '{}' rejected: {}", username, reason);
            return Ok(RegisterOutcome::failed(reason));
        }

        let response = ensure_success(context, response).await?;
        let body: RegisterResponse = read_json(context, response).await?;
        tracing::info!("Registered user '{}'", username);
        Ok(RegisterOutcome::succeeded(
            body.message
                .unwrap_or_else(|| DEFAULT_REGISTER_MESSAGE.to_string()),
        ))
    }

    async fn login(&self, username: &str, password: &str) -> Result<AuthSession> {
        let context = "POST /auth/login";
        let response = self
            .client
            .post(join_url(&self.base_url, "auth/login"))
            .json(&Credentials { username, password })
            .send()
            .await
            .map_err(|e| send_error(context, e))?;

        if response.status().is_client_error() {
            return Err(ProfileError::Auth(error_text(response).await));
        }

        let response = ensure_success(context, response).await?;
        let session: AuthSession = read_json(context, response).await?;
        tracing::info!("Logged in as '{}'", session.username);

        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    async fn logout(&self) {
        if let Some(session) = self.session.write().await.take() {
            tracing::info!("Logged out '{}'", session.username);
        }
    }
}
