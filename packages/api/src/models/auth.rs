//! # Auth request and response bodies
//!
//! | Struct | Endpoint | Direction |
//! |--------|----------|-----------|
//! | [`LoginRequest`] | `POST /auth/login` | browser → backend |
//! | [`LoginResponse`] | `POST /auth/login` (2xx) | backend → browser |
//! | [`RegisterRequest`] | `POST /auth/register` | browser → backend |
//! | [`MessageBody`] | any non-2xx, relay fallbacks | backend/relay → browser |
//!
//! [`LoginResponse::into_session`] maps the backend's `user_id` onto the
//! session's `id`; the two shapes differ only in that field name.

use serde::{Deserialize, Serialize};
use store::{Role, Session};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: i64,
    pub role: Role,
    pub username: String,
}

impl LoginResponse {
    pub fn into_session(self) -> Session {
        Session {
            id: self.user_id,
            role: self.role,
            username: self.username,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// `{ "message": ... }` body used for errors and relay fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_into_session() {
        let body = r#"{"user_id":7,"role":"Admin","username":"alice"}"#;
        let response: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response.into_session(),
            Session::new(7, Role::Admin, "alice")
        );
    }

    #[test]
    fn test_message_body_tolerates_missing_message() {
        let body: MessageBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.message, "");
    }
}
