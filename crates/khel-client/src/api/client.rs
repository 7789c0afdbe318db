//! # API Client
//!
//! HTTP client for the Khel backend's auth endpoints.

use reqwest::Client;
use std::time::Duration;

use super::error::{ApiError, ApiResult};
use super::types::{ApiEnvelope, LoginRequest};
use crate::descriptor::descriptor;
use crate::profile::Profile;
use crate::role::Role;

/// HTTP client for the Khel backend.
///
/// Keeps a cookie store so session cookies set by a login response are sent
/// back on later calls (logout in particular). Cheap to clone; clones share
/// the cookie store.
///
/// # Examples
///
/// ```rust,ignore
/// use khel_client::{KhelClient, Role};
///
/// let client = KhelClient::new("http://localhost:8000")?;
/// let profile = client.login(Role::Coach, "a@b.com", "secret").await?;
/// println!("Signed in as {:?}", profile.display_name());
/// ```
#[derive(Clone, Debug)]
pub struct KhelClient {
    base_url: String,
    http: Client,
}

impl KhelClient {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a client for the given backend URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        Self::with_timeout(base_url, Self::DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;
        Ok(Self { base_url, http })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Authenticates against the role's login endpoint.
    ///
    /// Sends exactly one request. The profile is taken from
    /// `data.<profile_key>` of the response, where the key comes from the
    /// role's descriptor.
    ///
    /// # Errors
    ///
    /// * [`ApiError::NoLoginEndpoint`] - role cannot sign in; nothing is sent
    /// * [`ApiError::Network`] - request failed
    /// * [`ApiError::ServerError`] - non-2xx status (bad credentials, unknown account)
    /// * [`ApiError::InvalidResponse`] - body is not the expected JSON
    /// * [`ApiError::MissingProfile`] - no profile object at the expected path
    pub async fn login(&self, role: Role, email: &str, password: &str) -> ApiResult<Profile> {
        let endpoints = descriptor(role)
            .auth
            .ok_or(ApiError::NoLoginEndpoint(role))?;

        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        tracing::debug!(%role, email = %email, endpoint = endpoints.login, "Sending login request");

        let res = self
            .http
            .post(format!("{}{}", self.base_url, endpoints.login))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(ApiError::ServerError {
                status: res.status().as_u16(),
                message: res.text().await.unwrap_or_default(),
            });
        }

        let envelope: ApiEnvelope = res
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        let record = envelope
            .data
            .get(endpoints.profile_key)
            .filter(|v| v.is_object())
            .ok_or_else(|| ApiError::MissingProfile {
                path: format!("data.{}", endpoints.profile_key),
            })?;

        serde_json::from_value(record.clone()).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Calls the role's logout endpoint, if it has one.
    ///
    /// # Returns
    ///
    /// `true` if a logout request was sent and accepted, `false` if the role
    /// has no logout endpoint.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Network`] - request failed
    /// * [`ApiError::ServerError`] - non-2xx status
    pub async fn logout(&self, role: Role) -> ApiResult<bool> {
        let Some(path) = descriptor(role).auth.and_then(|auth| auth.logout) else {
            return Ok(false);
        };

        let res = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(&serde_json::json!({}))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(ApiError::ServerError {
                status: res.status().as_u16(),
                message: res.text().await.unwrap_or_default(),
            });
        }

        Ok(true)
    }
}
