//! HttpUserDirectory - REST client for the user service behind the API gateway.
//!
//! Endpoints (relative to the gateway base URL):
//! - `GET /users/list`
//! - `POST /users/create`
//! - `PUT /users/update/{id}`
//! - `GET /users/get/{id}`
//! - `GET /health`

use crate::http::{build_client, ensure_success, join_url, read_json, send_error};
use async_trait::async_trait;
use profilehub_core::directory::UserDirectory;
use profilehub_core::user::{ProfilePayload, UserRecord};
use profilehub_core::{ProfileError, Result};
use profilehub_infrastructure::ClientConfig;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Client for the remote user store.
#[derive(Clone)]
pub struct HttpUserDirectory {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CreateUserResponse {
    id: String,
}

/// Body of the gateway health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    pub service: String,
    #[serde(default)]
    pub environment: Option<String>,
}

impl HttpUserDirectory {
    /// Creates a client for the gateway at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.api_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches a single record.
    ///
    /// A 404 maps to [`ProfileError::NotFound`].
    pub async fn get_user(&self, id: &str) -> Result<UserRecord> {
        let context = format!("GET /users/get/{}", id);
        let response = self
            .client
            .get(join_url(&self.base_url, &format!("users/get/{}", id)))
            .send()
            .await
            .map_err(|e| send_error(&context, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ProfileError::not_found("user", id));
        }
        let response = ensure_success(&context, response).await?;
        read_json(&context, response).await
    }

    /// Queries the gateway health endpoint.
    pub async fn health(&self) -> Result<ServiceHealth> {
        let context = "GET /health";
        let response = self
            .client
            .get(join_url(&self.base_url, "health"))
            .send()
            .await
            .map_err(|e| send_error(context, e))?;
        let response = ensure_success(context, response).await?;
        read_json(context, response).await
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn list_users(&self) -> Result<Vec<UserRecord>> {
        let context = "GET /users/list";
        let response = self
            .client
            .get(join_url(&self.base_url, "users/list"))
            .send()
            .await
            .map_err(|e| send_error(context, e))?;
        let response = ensure_success(context, response).await?;
        let users: Vec<UserRecord> = read_json(context, response).await?;

        tracing::debug!("Fetched {} user records", users.len());
        Ok(users)
    }

    async fn create_user(&self, payload: &ProfilePayload) -> Result<String> {
        let context = "POST /users/create";
        let response = self
            .client
            .post(join_url(&self.base_url, "users/create"))
            .json(payload)
            .send()
            .await
            .map_err(|e| send_error(context, e))?;
        let response = ensure_success(context, response).await?;
        let created: CreateUserResponse = read_json(context, response).await?;

        tracing::debug!("Created user record {} for {}", created.id, payload.username);
        Ok(created.id)
    }

    async fn update_user(&self, id: &str, payload: &ProfilePayload) -> Result<()> {
        let context = format!("PUT /users/update/{}", id);
        let response = self
            .client
            .put(join_url(&self.base_url, &format!("users/update/{}", id)))
            .json(payload)
            .send()
            .await
            .map_err(|e| send_error(&context, e))?;
        ensure_success(&context, response).await?;

        tracing::debug!("Updated user record {}", id);
        Ok(())
    }
}
