//! Sign-in state and the login/logout/register operations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use api::{paths, LoginRequest, LoginResponse, MessageBody, RegisterRequest};
use reqwest::Method;
use store::Session;

use crate::error::ClientError;
use crate::request::{ApiClient, RequestOptions};

/// Authentication state for the page layer.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
    /// True until [`AuthContext::bootstrap`] has run.
    pub loading: bool,
}

/// Login, logout and registration on top of an [`ApiClient`].
///
/// Login and logout always go through the relay endpoints so the token
/// cookies stay HTTP-only.
pub struct AuthContext {
    client: Arc<ApiClient>,
    loading: AtomicBool,
}

impl AuthContext {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            loading: AtomicBool::new(true),
        }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Finish start-up and return the session restored from local storage.
    pub fn bootstrap(&self) -> Option<Session> {
        self.loading.store(false, Ordering::Release);
        self.client.sessions().current_session()
    }

    pub fn state(&self) -> AuthState {
        AuthState {
            session: self.client.sessions().current_session(),
            loading: self.loading.load(Ordering::Acquire),
        }
    }

    /// Whether the signed-in user may open the club-management screens.
    pub fn can_manage_clubs(&self) -> bool {
        self.client
            .sessions()
            .current_session()
            .is_some_and(|session| session.role.can_manage_clubs())
    }

    /// Sign in through the login relay and remember the returned identity.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ClientError> {
        let url = self.client.config().relay_url(paths::RELAY_LOGIN);
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.client.post(&url, &body, false).await?;

        if !response.is_success() {
            let message = response
                .json::<MessageBody>()
                .map(|body| body.message)
                .unwrap_or_default();
            tracing::info!(status = %response.status, "login rejected");
            return Err(ClientError::LoginRejected {
                status: response.status,
                message,
            });
        }

        let session = response.json::<LoginResponse>()?.into_session();
        if let Err(e) = self.client.sessions().set_session(session.clone()) {
            tracing::warn!("failed to persist session: {}", e);
        }
        tracing::info!(user_id = session.id, role = %session.role, "signed in");
        Ok(session)
    }

    /// Sign out through the logout relay. The local session is cleared even
    /// when the relay cannot be reached.
    pub async fn logout(&self) {
        let url = self.client.config().relay_url(paths::RELAY_LOGOUT);
        let options = RequestOptions::new(Method::POST).requires_auth(false);
        match self.client.request(&url, options).await {
            Ok(response) if response.is_success() => tracing::info!("signed out"),
            Ok(response) => tracing::warn!(status = %response.status, "logout not confirmed"),
            Err(e) => tracing::error!("Logout error: {}", e),
        }

        if let Err(e) = self.client.sessions().clear_session() {
            tracing::warn!("failed to clear session: {}", e);
        }
    }

    /// Create an account. The caller signs in separately afterwards.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ClientError> {
        let response = self
            .client
            .post(paths::BACKEND_REGISTER, request, false)
            .await?;

        if response.is_success() {
            tracing::info!(username = %request.username, "registered");
            return Ok(());
        }

        let message = response
            .json::<MessageBody>()
            .ok()
            .map(|body| body.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| "Registration failed".to_string());
        Err(ClientError::RegisterRejected {
            status: response.status,
            message,
        })
    }
}
