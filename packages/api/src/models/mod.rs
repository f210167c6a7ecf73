//! Wire models for the auth endpoints.

mod auth;

pub use auth::{LoginRequest, LoginResponse, MessageBody, RegisterRequest};
