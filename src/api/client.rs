//! HTTP client for the rental backend.
//!
//! Every call resolves to an [`ApiResponse`]. Transport failures, non-2xx
//! statuses and unparseable bodies all come back as a typed [`ApiError`];
//! nothing escapes as a raw `reqwest` error.
//!
//! The client reads the session token on every request and attaches it as a
//! bearer credential. It never clears the session or redirects on a 401;
//! that policy belongs to the caller.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Client;
use serde_json::Value;

use super::error::{ApiError, ErrorKind};
use super::types::{ApiRequest, ApiResponse, RequestBody};
use crate::core::config::{DEFAULT_TIMEOUT_SECS, ResolvedConfig};
use crate::core::session::SessionStore;

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Create a client against `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS), session)
    }

    pub fn from_config(config: &ResolvedConfig, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        Self::with_timeout(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
            session,
        )
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::new(ErrorKind::Unknown, format!("failed to build HTTP client: {e}"), None))?;
        Ok(Self {
            base_url: base_url.into(),
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Joins the base endpoint and a request path with exactly one slash.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Sends one request and normalizes the outcome.
    pub async fn send(&self, request: ApiRequest) -> ApiResponse {
        let url = self.url(&request.path);
        info!("API request: {} {}", request.method, url);

        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.session.token().filter(|t| !t.is_empty()) {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            Some(RequestBody::Json(body)) => builder.json(&body),
            Some(RequestBody::Multipart(form)) => builder.multipart(form.into_form()?),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        let status = response.status();
        debug!("API response status: {} for {} {}", status, request.method, url);

        let body = response
            .text()
            .await
            .map_err(|e| body_read_error(status.as_u16(), &e))?;

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), &body);
            warn!("API error: {} {} -> {}", request.method, url, err);
            return Err(err);
        }

        parse_body(status.as_u16(), &body)
    }
}

/// A response arrived but its body could not be read. The status is kept so
/// callers can still branch on it; a 2xx with a broken body is `Unknown`.
fn body_read_error(status: u16, err: &reqwest::Error) -> ApiError {
    warn!("Failed to read response body (HTTP {}): {}", status, err);
    // 2xx falls through to Unknown.
    ApiError::new(ErrorKind::from_status(status), format!("failed to read response body: {err}"), Some(status))
}

/// Parses a 2xx body. An empty body is `Value::Null`.
fn parse_body(status: u16, body: &str) -> ApiResponse {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| {
        warn!("Failed to parse response body (HTTP {}): {}", status, e);
        ApiError::new(ErrorKind::Unknown, format!("invalid JSON in response: {e}"), Some(status))
    })
}
