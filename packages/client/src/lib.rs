//! # Client crate: authenticated access to the backend
//!
//! Everything a page needs to talk to the backend while signed in.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`request`] | [`ApiClient`]: one request, and on a 401 a single coordinated refresh and one retry |
//! | [`coordinator`] | [`RefreshCoordinator`]: at most one refresh in flight, everyone else waits for its outcome |
//! | [`transport`] | The [`Transport`] seam and its reqwest implementation with a shared cookie jar |
//! | [`auth`] | [`AuthContext`]: login, logout and registration on top of the client |
//! | [`navigator`] | Where the "go to sign-in" redirect is sent |
//! | [`config`] | [`ClientConfig`]: backend base URL, app origin, sign-in path |
//!
//! Tokens never appear here. They live in HTTP-only cookies that the
//! transport's cookie jar carries and only the relay and backend ever set.

pub mod auth;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod navigator;
pub mod request;
pub mod transport;

#[cfg(test)]
mod testing;

pub use auth::{AuthContext, AuthState};
pub use config::ClientConfig;
pub use coordinator::{
    RefreshCoordinator, RefreshFailure, RefreshOutcome, RefreshRole, RefreshTicket, RefreshWaiter,
    Settled,
};
pub use error::{ClientError, TransportError};
pub use navigator::{LogNavigator, Navigator};
pub use request::{ApiClient, RequestOptions};
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};

pub use reqwest::header;
pub use reqwest::{Method, StatusCode};
