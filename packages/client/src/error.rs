use reqwest::StatusCode;
use store::StoreError;
use thiserror::Error;

use crate::coordinator::RefreshFailure;

/// A request could not be completed at the transport level.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend unreachable: {0}")]
    Unreachable(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The session could not be refreshed; the user has to sign in again.
    #[error("session expired: {0}")]
    RefreshFailed(RefreshFailure),

    #[error("login rejected ({status}): {message}")]
    LoginRejected { status: StatusCode, message: String },

    #[error("registration rejected ({status}): {message}")]
    RegisterRejected { status: StatusCode, message: String },

    #[error("unexpected response body: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}
