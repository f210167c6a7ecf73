//! # Session model
//!
//! [`Session`] is the identity of the signed-in user as last reported by the
//! backend's login response. It is always replaced wholesale, never patched.
//!
//! The persisted JSON shape is `{ "id": 7, "role": "Admin", "username": "alice" }`.
//! [`Role`] is closed over the backend's role strings; an unknown string makes
//! the whole record malformed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Club roles assigned by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "General Member")]
    GeneralMember,
    #[serde(rename = "Club Executive")]
    ClubExecutive,
    #[serde(rename = "Admin")]
    Admin,
}

impl Role {
    /// The wire string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::GeneralMember => "General Member",
            Role::ClubExecutive => "Club Executive",
            Role::Admin => "Admin",
        }
    }

    /// Whether the club-management screens are open to this role.
    pub fn can_manage_clubs(&self) -> bool {
        matches!(self, Role::ClubExecutive | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locally cached identity of the signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Server-assigned user id.
    pub id: i64,
    pub role: Role,
    pub username: String,
}

impl Session {
    pub fn new(id: i64, role: Role, username: impl Into<String>) -> Self {
        Self {
            id,
            role,
            username: username.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_wire_shape() {
        let session = Session::new(7, Role::Admin, "alice");
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": 7, "role": "Admin", "username": "alice" })
        );
    }

    #[test]
    fn test_role_strings() {
        let role: Role = serde_json::from_str("\"Club Executive\"").unwrap();
        assert_eq!(role, Role::ClubExecutive);
        assert_eq!(Role::GeneralMember.to_string(), "General Member");
        assert!(serde_json::from_str::<Role>("\"Superuser\"").is_err());
    }

    #[test]
    fn test_can_manage_clubs() {
        assert!(Role::Admin.can_manage_clubs());
        assert!(Role::ClubExecutive.can_manage_clubs());
        assert!(!Role::GeneralMember.can_manage_clubs());
    }
}
