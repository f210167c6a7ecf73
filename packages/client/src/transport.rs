//! The HTTP seam under [`crate::ApiClient`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, TransportError};

/// A fully resolved request. Cloned as-is when it has to be re-issued.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_slice(&self.body).map_err(ClientError::MalformedResponse)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends one request and returns whatever came back.
///
/// Implementations attach the caller's credentials (the cookie jar) to every
/// request and never interpret the status.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// reqwest transport with a cookie jar shared by every request it sends.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    jar: Arc<Jar>,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::with_jar(Arc::new(Jar::default()))
    }

    /// Build a transport around an existing cookie jar.
    pub fn with_jar(jar: Arc<Jar>) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .build()?;
        Ok(Self { http, jar })
    }

    pub fn cookie_jar(&self) -> &Arc<Jar> {
        &self.jar
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut builder = self
            .http
            .request(request.method, &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{COOKIE, SET_COOKIE};
    use axum::routing::{get, post};
    use axum::Router;

    async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn request(method: Method, url: String) -> ApiRequest {
        ApiRequest {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn test_cookie_jar_carries_relay_cookies_to_backend() {
        let relay = spawn_stub(Router::new().route(
            "/api/auth/refresh",
            post(|| async {
                (
                    [(SET_COOKIE, "access_token_cookie=a2; HttpOnly; Path=/")],
                    "{}",
                )
            }),
        ))
        .await;
        let backend = spawn_stub(Router::new().route(
            "/clubs/",
            get(|headers: HeaderMap| async move {
                headers
                    .get(COOKIE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string()
            }),
        ))
        .await;
        let transport = ReqwestTransport::new().unwrap();

        let before = transport
            .send(request(Method::GET, format!("{}/clubs/", backend)))
            .await
            .unwrap();
        assert!(before.is_success());
        assert_eq!(before.text(), "");

        let refreshed = transport
            .send(request(Method::POST, format!("{}/api/auth/refresh", relay)))
            .await
            .unwrap();
        assert!(refreshed.is_success());

        let after = transport
            .send(request(Method::GET, format!("{}/clubs/", backend)))
            .await
            .unwrap();
        assert_eq!(after.text(), "access_token_cookie=a2");
    }

    #[tokio::test]
    async fn test_status_is_returned_uninterpreted() {
        let backend = spawn_stub(Router::new().route(
            "/clubs/",
            get(|| async { (StatusCode::UNAUTHORIZED, "{\"msg\":\"Token has expired\"}") }),
        ))
        .await;
        let transport = ReqwestTransport::new().unwrap();

        let response = transport
            .send(request(Method::GET, format!("{}/clubs/", backend)))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.text(), r#"{"msg":"Token has expired"}"#);
    }
}
