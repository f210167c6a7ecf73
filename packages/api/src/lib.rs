//! # API crate: the auth boundary between the browser and the backend
//!
//! This crate defines the JSON shapes exchanged with the backend's auth
//! endpoints and, behind the `server` feature, the cookie relay that the
//! browser talks to instead of the backend.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`models`] | no | Login/register request and response bodies, `{ message }` error body |
//! | [`paths`] | no | Relay and backend endpoint paths |
//! | [`backend`] | `server` | reqwest client for the backend's `/auth/*` endpoints |
//! | [`relay`] | `server` | axum handlers for `/api/auth/{login,logout,refresh}` |
//! | [`settings`] | `server` | Layered configuration (defaults, `config.toml`, environment) |
//! | [`error`] | `server` | [`RelayError`] |
//!
//! ## Cookies
//!
//! The backend delivers access and refresh tokens as HTTP-only cookies. The
//! relay forwards the browser's `Cookie` header to the backend and copies every
//! `Set-Cookie` header back verbatim, so token values never pass through
//! client-side code and the relay itself never parses them.

pub mod models;
pub mod paths;

#[cfg(feature = "server")]
pub mod backend;
#[cfg(feature = "server")]
pub mod error;
#[cfg(feature = "server")]
pub mod relay;
#[cfg(feature = "server")]
pub mod settings;

pub use models::{LoginRequest, LoginResponse, MessageBody, RegisterRequest};

#[cfg(feature = "server")]
pub use backend::{BackendClient, BackendResponse};
#[cfg(feature = "server")]
pub use error::RelayError;
#[cfg(feature = "server")]
pub use relay::{router, RelayState};
#[cfg(feature = "server")]
pub use settings::Settings;
