//! HTTP client for the Sistema de Alerta Temprana backend.
//!
//! The backend exposes a small token-based auth surface: a login endpoint
//! that issues an opaque bearer token, a verify endpoint that validates a
//! previously issued token, and a logout endpoint that revokes one.

use std::time::Duration;

use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ApiError;

/// Default backend base URL (overridable via config or ALERTA_API_URL)
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// HTTP request timeout in seconds.
/// Short enough that a dead server surfaces as a login error quickly.
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// User record as returned by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub username: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: ApiUser,
    #[serde(rename = "expiresIn", default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(default)]
    pub user: Option<ApiUser>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// API client for the alerta backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Exchange a username/password pair for a session token
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = format!("{}/auth/login", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.json::<LoginResponse>().await?)
    }

    /// Validate a previously issued session token
    pub async fn verify(&self, token: &str) -> Result<VerifyResponse, ApiError> {
        let url = format!("{}/auth/verify", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?;

        // The backend answers 401 with {"valid": false} for bad tokens;
        // treat that as a definite answer rather than an error.
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(VerifyResponse {
                valid: false,
                user: None,
            });
        }

        let response = Self::check_response(response).await?;
        Ok(response.json::<VerifyResponse>().await?)
    }

    /// Revoke a session token server-side. Best effort - callers should not
    /// block logout on this.
    pub async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let url = format!("{}/auth/logout", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header(header::CONTENT_LENGTH, 0)
            .send()
            .await?;

        Self::check_response(response).await?;
        debug!("session token revoked server-side");
        Ok(())
    }

    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}
