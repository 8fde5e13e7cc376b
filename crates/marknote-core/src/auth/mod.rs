//! Account registration and login against the note service.
//!
//! Login produces the [`SessionContext`] that the sync engine uses; the
//! caller decides where to keep it.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::remote::{
    map_status, map_transport_error, normalize_base_url, RemoteConfigError, RemoteError,
};
use crate::session::SessionContext;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid auth configuration: {0}")]
    InvalidConfiguration(String),
    #[error("{0} is required")]
    MissingCredential(&'static str),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Auth request failed: {0}")]
    Remote(RemoteError),
    #[error("Login response did not include a token")]
    MissingToken,
}

impl From<RemoteConfigError> for AuthError {
    fn from(error: RemoteConfigError) -> Self {
        Self::InvalidConfiguration(error.to_string())
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    client: Client,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AuthResult<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| AuthError::InvalidConfiguration(error.to_string()))?;
        Ok(Self { base_url, client })
    }

    /// Create an account. The server does not sign the user in.
    pub async fn register(&self, username: &str, password: &str) -> AuthResult<()> {
        let credentials = Credentials::new(username, password)?;
        self.send(
            self.client
                .post(format!("{}/api/register", self.base_url))
                .json(&credentials),
        )
        .await?;
        tracing::info!("Registered account {}", credentials.username);
        Ok(())
    }

    /// Exchange username/password for a session token
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<SessionContext> {
        let credentials = Credentials::new(username, password)?;
        let response = self
            .send(
                self.client
                    .post(format!("{}/api/login", self.base_url))
                    .json(&credentials),
            )
            .await?;

        let body = response
            .text()
            .await
            .map_err(|error| AuthError::Remote(map_transport_error(error)))?;
        let payload: LoginResponse = serde_json::from_str(&body).map_err(|error| {
            AuthError::Remote(RemoteError::ServerRejected(format!(
                "invalid login payload: {error}"
            )))
        })?;

        let token = payload.into_token()?;
        tracing::info!("Signed in as {}", credentials.username);
        Ok(SessionContext::new(credentials.username, token))
    }

    async fn send(&self, request: RequestBuilder) -> AuthResult<reqwest::Response> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| AuthError::Remote(map_transport_error(error)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match map_status(status, &body) {
            RemoteError::Unauthorized => Err(AuthError::InvalidCredentials),
            other => Err(AuthError::Remote(other)),
        }
    }
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

impl<'a> Credentials<'a> {
    fn new(username: &'a str, password: &'a str) -> AuthResult<Self> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::MissingCredential("Username"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingCredential("Password"));
        }
        Ok(Self { username, password })
    }
}

/// Login response; older server builds send `Token`
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default, alias = "Token")]
    token: Option<String>,
}

impl LoginResponse {
    fn into_token(self) -> AuthResult<String> {
        self.token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)
    }
}
