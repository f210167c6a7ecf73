//! HTTP client for the backend's auth endpoints.

use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderValue, StatusCode};
use serde_json::Value;

use crate::error::RelayError;

/// What the backend answered, reduced to the parts the relay passes on.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    /// Every `Set-Cookie` header, in the order the backend sent them.
    pub set_cookies: Vec<HeaderValue>,
    pub body: Value,
}

/// Backend client without a cookie jar: cookies are relayed by hand.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `path` with the browser's cookie header and an optional JSON body.
    pub async fn post(
        &self,
        path: &str,
        cookie: Option<&HeaderValue>,
        body: Option<&Value>,
    ) -> Result<BackendResponse, RelayError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie.clone());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let set_cookies: Vec<HeaderValue> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .cloned()
            .collect();
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes).map_err(RelayError::MalformedBody)?;

        tracing::debug!(%url, %status, cookies = set_cookies.len(), "backend responded");

        Ok(BackendResponse {
            status,
            set_cookies,
            body,
        })
    }
}
