//! # Authenticated request client
//!
//! [`ApiClient::request`] is what every page uses to call the backend. It
//! sends the request once; a 401 on a request that requires authentication
//! triggers the refresh protocol:
//!
//! 1. Ask the [`RefreshCoordinator`] for a role.
//! 2. As the **driver**, call the refresh relay. On success complete the cycle
//!    and re-issue the original request once. On failure complete the cycle
//!    as failed (waking every waiter), clear the session, redirect to sign-in
//!    and return [`ClientError::RefreshFailed`].
//! 3. As a **waiter**, await the driver's outcome. On success re-issue the
//!    original request once; on failure return the same error without
//!    re-issuing and without redirecting. The one exception is a driver that
//!    went away mid-refresh: the oldest waiter then clears the session and
//!    redirects in its place.
//!
//! The re-issued request is returned whatever its status, a second 401
//! included; no request is retried more than once. Every other status,
//! success or error, goes back to the caller untouched.

use std::sync::Arc;

use api::paths;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use store::SessionStore;

use crate::config::ClientConfig;
use crate::coordinator::{RefreshCoordinator, RefreshFailure, RefreshOutcome, RefreshRole};
use crate::error::{ClientError, TransportError};
use crate::navigator::Navigator;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Per-request options.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Vec<u8>>,
    /// Caller headers; these win over the default `Content-Type`.
    pub headers: HeaderMap,
    /// Whether a 401 should trigger refresh-and-retry.
    pub requires_auth: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
            requires_auth: true,
        }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_vec(body).map_err(ClientError::Encode)?);
        Ok(self)
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn requires_auth(mut self, requires_auth: bool) -> Self {
        self.requires_auth = requires_auth;
        self
    }
}

/// Client for backend calls with 401-triggered refresh and retry.
pub struct ApiClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    navigator: Arc<dyn Navigator>,
    sessions: Arc<SessionStore>,
    coordinator: RefreshCoordinator,
}

impl ApiClient {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            config,
            transport,
            navigator,
            sessions,
            coordinator: RefreshCoordinator::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    /// Send a request to `endpoint`, refreshing the session once on a 401.
    pub async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ClientError> {
        let requires_auth = options.requires_auth;
        let request = self.build_request(endpoint, options);

        let response = self.send(request.clone()).await?;
        if response.status != StatusCode::UNAUTHORIZED || !requires_auth {
            return Ok(response);
        }

        tracing::debug!(url = %request.url, "unauthorized, session needs a refresh");
        match self.coordinator.begin_refresh() {
            RefreshRole::Driver(ticket) => match self.refresh_session().await {
                Ok(()) => {
                    ticket.complete(RefreshOutcome::Refreshed);
                    Ok(self.send(request).await?)
                }
                Err(failure) => {
                    ticket.complete(RefreshOutcome::Failed(failure.clone()));
                    self.end_session();
                    Err(ClientError::RefreshFailed(failure))
                }
            },
            RefreshRole::Waiter(waiter) => {
                let settled = waiter.settled().await;
                match settled.outcome {
                    RefreshOutcome::Refreshed => Ok(self.send(request).await?),
                    RefreshOutcome::Failed(failure) => {
                        if settled.end_session {
                            self.end_session();
                        }
                        Err(ClientError::RefreshFailed(failure))
                    }
                }
            }
        }
    }

    pub async fn get(
        &self,
        endpoint: &str,
        requires_auth: bool,
    ) -> Result<ApiResponse, ClientError> {
        let options = RequestOptions::new(Method::GET).requires_auth(requires_auth);
        self.request(endpoint, options).await
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        data: &T,
        requires_auth: bool,
    ) -> Result<ApiResponse, ClientError> {
        let options = RequestOptions::new(Method::POST)
            .json(data)?
            .requires_auth(requires_auth);
        self.request(endpoint, options).await
    }

    pub async fn put<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        data: &T,
        requires_auth: bool,
    ) -> Result<ApiResponse, ClientError> {
        let options = RequestOptions::new(Method::PUT)
            .json(data)?
            .requires_auth(requires_auth);
        self.request(endpoint, options).await
    }

    pub async fn delete(
        &self,
        endpoint: &str,
        requires_auth: bool,
    ) -> Result<ApiResponse, ClientError> {
        let options = RequestOptions::new(Method::DELETE).requires_auth(requires_auth);
        self.request(endpoint, options).await
    }

    fn build_request(&self, endpoint: &str, options: RequestOptions) -> ApiRequest {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for name in options.headers.keys() {
            headers.remove(name);
        }
        for (name, value) in options.headers.iter() {
            headers.append(name.clone(), value.clone());
        }

        ApiRequest {
            method: options.method,
            url: self.config.resolve(endpoint),
            headers,
            body: options.body,
        }
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let method = request.method.clone();
        let url = request.url.clone();
        match self.transport.send(request).await {
            Ok(response) => {
                tracing::debug!(%method, %url, status = %response.status, "request completed");
                Ok(response)
            }
            Err(e) => {
                tracing::error!(%method, %url, "API request failed: {}", e);
                Err(e)
            }
        }
    }

    async fn refresh_session(&self) -> Result<(), RefreshFailure> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let request = ApiRequest {
            method: Method::POST,
            url: self.config.relay_url(paths::RELAY_REFRESH),
            headers,
            body: None,
        };

        match self.transport.send(request).await {
            Ok(response) if response.is_success() => {
                tracing::info!("access token refreshed");
                Ok(())
            }
            Ok(response) => {
                tracing::warn!(status = %response.status, "token refresh rejected");
                Err(RefreshFailure::Rejected {
                    status: response.status,
                })
            }
            Err(e) => {
                tracing::error!("token refresh failed: {}", e);
                Err(RefreshFailure::Unreachable(e.to_string()))
            }
        }
    }

    fn end_session(&self) {
        if let Err(e) = self.sessions.clear_session() {
            tracing::warn!("failed to clear session: {}", e);
        }
        self.navigator.redirect(&self.config.sign_in_path);
    }
}
