//! In-process fakes for the client tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use api::paths;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use serde_json::{json, Value};
use store::{MemoryStorage, SessionStore};
use tokio::sync::Notify;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::navigator::Navigator;
use crate::request::ApiClient;
use crate::transport::{ApiRequest, ApiResponse, Transport};

#[derive(Debug)]
struct FakeState {
    access_valid: bool,
    refresh_accepts: bool,
    refresh_unreachable: bool,
    refresh_takes_effect: bool,
    refresh_calls: usize,
    sent: Vec<ApiRequest>,
}

/// Fake relay + backend behind a [`Transport`].
///
/// Domain paths answer 200 while the access token is valid and 401 otherwise.
/// `/missing` answers 404, `/forbidden` 403, and `/unreachable` fails at the
/// transport level.
#[derive(Debug)]
pub(crate) struct FakeBackend {
    state: Mutex<FakeState>,
    refresh_gate: Option<Arc<Notify>>,
}

impl FakeBackend {
    fn new(access_valid: bool) -> Self {
        Self {
            state: Mutex::new(FakeState {
                access_valid,
                refresh_accepts: true,
                refresh_unreachable: false,
                refresh_takes_effect: true,
                refresh_calls: 0,
                sent: Vec::new(),
            }),
            refresh_gate: None,
        }
    }

    pub(crate) fn signed_in() -> Self {
        Self::new(true)
    }

    /// Access token expired, refresh token still good.
    pub(crate) fn expired() -> Self {
        Self::new(false)
    }

    pub(crate) fn reject_refresh(self) -> Self {
        self.lock().refresh_accepts = false;
        self
    }

    pub(crate) fn refresh_unreachable(self) -> Self {
        self.lock().refresh_unreachable = true;
        self
    }

    /// Refresh answers 200 but the backend keeps rejecting the access token.
    pub(crate) fn refresh_without_effect(self) -> Self {
        self.lock().refresh_takes_effect = false;
        self
    }

    /// Keep every refresh call in flight until `gate` is notified.
    pub(crate) fn hold_refresh(mut self, gate: Arc<Notify>) -> Self {
        self.refresh_gate = Some(gate);
        self
    }

    pub(crate) fn refresh_calls(&self) -> usize {
        self.lock().refresh_calls
    }

    pub(crate) fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.lock()
            .sent
            .iter()
            .filter(|r| path_of(&r.url) == path)
            .cloned()
            .collect()
    }

    pub(crate) fn sent_to(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn refresh(&self) -> Result<ApiResponse, TransportError> {
        self.lock().refresh_calls += 1;
        if let Some(gate) = &self.refresh_gate {
            gate.notified().await;
        }

        let mut state = self.lock();
        if state.refresh_unreachable {
            return Err(TransportError::Unreachable("connection refused".into()));
        }
        if !state.refresh_accepts {
            return Ok(json_response(
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Token has expired" }),
            ));
        }
        if state.refresh_takes_effect {
            state.access_valid = true;
        }
        Ok(json_response(StatusCode::OK, json!({ "refresh": true })))
    }

    fn login(&self, body: Option<&[u8]>) -> ApiResponse {
        let body: Value = body
            .and_then(|b| serde_json::from_slice(b).ok())
            .unwrap_or_default();
        if body["username"] == "alice" && body["password"] == "secret" {
            self.lock().access_valid = true;
            json_response(
                StatusCode::OK,
                json!({ "user_id": 7, "role": "Admin", "username": "alice" }),
            )
        } else {
            json_response(
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Invalid username or password" }),
            )
        }
    }

    fn register(&self, body: Option<&[u8]>) -> ApiResponse {
        let body: Value = body
            .and_then(|b| serde_json::from_slice(b).ok())
            .unwrap_or_default();
        if body["username"] == "taken" {
            json_response(
                StatusCode::CONFLICT,
                json!({ "message": "Username already exists" }),
            )
        } else {
            json_response(
                StatusCode::CREATED,
                json!({ "message": "User registered successfully" }),
            )
        }
    }

    fn domain(&self, path: &str) -> ApiResponse {
        match path {
            "/missing" => json_response(StatusCode::NOT_FOUND, json!({ "message": "Not found" })),
            "/forbidden" => {
                json_response(StatusCode::FORBIDDEN, json!({ "message": "Forbidden" }))
            }
            _ if self.lock().access_valid => json_response(StatusCode::OK, json!({ "path": path })),
            _ => json_response(
                StatusCode::UNAUTHORIZED,
                json!({ "msg": "Token has expired" }),
            ),
        }
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.lock().sent.push(request.clone());
        let path = path_of(&request.url);
        let body = request.body.as_deref();

        match path.as_str() {
            paths::RELAY_REFRESH => self.refresh().await,
            paths::RELAY_LOGIN => Ok(self.login(body)),
            paths::RELAY_LOGOUT => {
                self.lock().access_valid = false;
                Ok(json_response(
                    StatusCode::OK,
                    json!({ "message": "Logout successful" }),
                ))
            }
            paths::BACKEND_REGISTER => Ok(self.register(body)),
            "/unreachable" => Err(TransportError::Unreachable("connection refused".into())),
            other => Ok(self.domain(other)),
        }
    }
}

/// Navigator that remembers where it was sent.
#[derive(Debug, Default)]
pub(crate) struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub(crate) fn visits(&self) -> Vec<String> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}

pub(crate) fn client_for(backend: Arc<FakeBackend>) -> (ApiClient, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::default());
    let sessions = Arc::new(SessionStore::bootstrap(Arc::new(MemoryStorage::new())));
    let client = ApiClient::new(
        ClientConfig::default(),
        backend,
        navigator.clone(),
        sessions,
    );
    (client, navigator)
}

fn json_response(status: StatusCode, body: Value) -> ApiResponse {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    ApiResponse {
        status,
        headers,
        body: body.to_string().into_bytes(),
    }
}

fn path_of(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.path().to_owned())
        .unwrap_or_else(|_| "/".to_string())
}
