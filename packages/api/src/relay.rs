//! # Cookie relay endpoints
//!
//! Three axum handlers that stand between the browser and the backend's auth
//! endpoints:
//!
//! | Route | Backend | Forwards | On backend failure |
//! |-------|---------|----------|--------------------|
//! | `POST /api/auth/login` | `/auth/login` | JSON body + `Cookie` | 500 `Internal server error` |
//! | `POST /api/auth/logout` | `/auth/logout` | `Cookie` | 500 `Logout failed` |
//! | `POST /api/auth/refresh` | `/auth/refresh` | `Cookie` | 401 `Token refresh failed` |
//!
//! When the backend answers, its JSON body and status are passed through
//! unchanged (logout always reports 200), and every `Set-Cookie` header is
//! appended to the outgoing response in the order received. Cookie values are
//! never parsed, logged or rewritten.
//!
//! "Backend failure" means the backend could not be reached or answered with a
//! body that is not JSON.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use crate::backend::{BackendClient, BackendResponse};
use crate::models::MessageBody;
use crate::paths;

/// Shared state of the relay routes.
#[derive(Debug, Clone)]
pub struct RelayState {
    pub backend: BackendClient,
}

impl RelayState {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

/// Router serving the three relay endpoints.
pub fn router(state: RelayState) -> Router {
    Router::new()
        .route(paths::RELAY_LOGIN, post(login))
        .route(paths::RELAY_LOGOUT, post(logout))
        .route(paths::RELAY_REFRESH, post(refresh))
        .with_state(state)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Login,
    Logout,
    Refresh,
}

impl Endpoint {
    fn name(self) -> &'static str {
        match self {
            Endpoint::Login => "login",
            Endpoint::Logout => "logout",
            Endpoint::Refresh => "refresh",
        }
    }

    fn backend_path(self) -> &'static str {
        match self {
            Endpoint::Login => paths::BACKEND_LOGIN,
            Endpoint::Logout => paths::BACKEND_LOGOUT,
            Endpoint::Refresh => paths::BACKEND_REFRESH,
        }
    }

    fn relayed_status(self, upstream: StatusCode) -> StatusCode {
        match self {
            Endpoint::Logout => StatusCode::OK,
            Endpoint::Login | Endpoint::Refresh => upstream,
        }
    }

    fn fallback(self) -> (StatusCode, &'static str) {
        match self {
            Endpoint::Login => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
            Endpoint::Logout => (StatusCode::INTERNAL_SERVER_ERROR, "Logout failed"),
            Endpoint::Refresh => (StatusCode::UNAUTHORIZED, "Token refresh failed"),
        }
    }

    fn fallback_response(self) -> Response {
        let (status, message) = self.fallback();
        (status, Json(MessageBody::new(message))).into_response()
    }
}

/// Relay a login attempt. The body is read as raw bytes so an unreadable
/// one gets the login fallback instead of an extractor rejection.
pub async fn login(State(state): State<RelayState>, headers: HeaderMap, body: Bytes) -> Response {
    let body: Value = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(endpoint = Endpoint::Login.name(), "unreadable login body: {}", e);
            return Endpoint::Login.fallback_response();
        }
    };
    relay(&state, Endpoint::Login, headers.get(COOKIE), Some(&body)).await
}

/// Relay a logout; the backend answers with cookie-clearing headers.
pub async fn logout(State(state): State<RelayState>, headers: HeaderMap) -> Response {
    relay(&state, Endpoint::Logout, headers.get(COOKIE), None).await
}

/// Relay a token refresh using the browser's refresh-token cookie.
pub async fn refresh(State(state): State<RelayState>, headers: HeaderMap) -> Response {
    relay(&state, Endpoint::Refresh, headers.get(COOKIE), None).await
}

async fn relay(
    state: &RelayState,
    endpoint: Endpoint,
    cookie: Option<&HeaderValue>,
    body: Option<&Value>,
) -> Response {
    match state
        .backend
        .post(endpoint.backend_path(), cookie, body)
        .await
    {
        Ok(upstream) => {
            let status = endpoint.relayed_status(upstream.status);
            tracing::info!(
                endpoint = endpoint.name(),
                %status,
                cookies = upstream.set_cookies.len(),
                "relayed auth request"
            );
            relayed_response(status, upstream)
        }
        Err(e) => {
            tracing::error!(endpoint = endpoint.name(), "auth relay failed: {}", e);
            endpoint.fallback_response()
        }
    }
}

fn relayed_response(status: StatusCode, upstream: BackendResponse) -> Response {
    let mut response = (status, Json(upstream.body)).into_response();
    let headers = response.headers_mut();
    for cookie in upstream.set_cookies {
        headers.append(SET_COOKIE, cookie);
    }
    response
}
