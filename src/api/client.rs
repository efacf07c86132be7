use crate::core::auth::AuthContext;
use crate::core::config::ApiConfig;
use crate::core::error::TransportError;
use crate::core::routes::{Navigator, Route};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Pre-authentication endpoints. A 401 from one of these is a failed login
/// or OTP attempt, not an expired session.
pub const PUBLIC_ENDPOINTS: [&str; 5] = [
    "/api/user/sendOtp",
    "/api/user/verifyOtp",
    "/api/user/resetPassword",
    "/api/login",
    "/api/register",
];

pub fn is_public_endpoint(path: &str) -> bool {
    PUBLIC_ENDPOINTS.iter().any(|public| path.contains(public))
}

/// The single request sender for the backend REST API
pub struct HttpClient {
    client: reqwest::Client,
    origin: String,
    auth: Arc<AuthContext>,
    navigator: Arc<dyn Navigator>,
}

impl HttpClient {
    pub fn new(
        config: &ApiConfig,
        auth: Arc<AuthContext>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            origin: config.origin.trim_end_matches('/').to_string(),
            auth,
            navigator,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn auth(&self) -> &Arc<AuthContext> {
        &self.auth
    }

    pub async fn get(&self, path: &str) -> Result<Value, TransportError> {
        self.send::<()>(Method::GET, path, None).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, TransportError> {
        self.send::<()>(Method::DELETE, path, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, TransportError> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, TransportError> {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, TransportError> {
        self.send(Method::PATCH, path, Some(body)).await
    }

    /// Send one request. Successful payloads are returned as-is; a body that
    /// is not JSON comes back as a JSON string.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, TransportError> {
        let url = format!("{}{}", self.origin, path);
        let epoch = self.auth.epoch();

        let mut request = self.client.request(method.clone(), &url);
        if let Some(token) = self.auth.bearer() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(method = %method, url = %url, epoch, "Sending request");

        let response = request.send().await.map_err(TransportError::from_reqwest)?;
        let status = response.status();
        let text = response.text().await.map_err(TransportError::from_reqwest)?;
        let payload = parse_body(&text);

        if status.is_success() {
            debug!(method = %method, url = %url, status = status.as_u16(), "Request succeeded");
            return Ok(payload);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(path, epoch);
        }

        warn!(method = %method, url = %url, status = status.as_u16(), "Request failed");

        Err(TransportError::Response {
            status: status.as_u16(),
            body: payload,
        })
    }

    /// The only place that clears the session and forces navigation
    fn handle_unauthorized(&self, path: &str, epoch: u64) {
        if is_public_endpoint(path) {
            debug!(path, "401 from public endpoint, leaving session untouched");
            return;
        }

        if self.auth.expire(epoch) {
            warn!(path, "Session rejected by server, redirecting to login");
            self.navigator.navigate(Route::Login);
        }
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
