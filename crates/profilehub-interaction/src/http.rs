//! Shared helpers for the REST adapters.

use profilehub_core::{ProfileError, Result};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Error body returned by the gateway and services: `{"error": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProfileError::internal(format!("Failed to build HTTP client: {}", e)))
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Converts a reqwest send failure into a transport error.
pub(crate) fn send_error(context: &str, err: reqwest::Error) -> ProfileError {
    let reason = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("service unreachable: {}", err)
    } else {
        err.to_string()
    };
    ProfileError::transport(format!("{} failed: {}", context, reason))
}

/// Extracts the server-provided reason from a non-success response.
pub(crate) async fn error_text(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody { error: Some(error), .. }) => error,
        Ok(ErrorBody { message: Some(message), .. }) => message,
        _ if !body.trim().is_empty() => body,
        _ => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}

/// Fails with a transport error unless the response status is 2xx.
pub(crate) async fn ensure_success(context: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let reason = error_text(response).await;
    Err(ProfileError::http_status(
        status.as_u16(),
        format!("{} failed: {}", context, reason),
    ))
}

pub(crate) async fn read_json<T: DeserializeOwned>(context: &str, response: Response) -> Result<T> {
    let body = response
        .text()
        .await
        .map_err(|e| ProfileError::transport(format!("{} failed to read body: {}", context, e)))?;
    serde_json::from_str(&body).map_err(ProfileError::from)
}
