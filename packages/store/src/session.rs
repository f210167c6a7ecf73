//! # Session store
//!
//! [`SessionStore`] owns the current [`Session`] and its persisted copy under
//! [`SESSION_KEY`]. The in-memory value and the persisted record move together:
//! [`set_session`](SessionStore::set_session) replaces both,
//! [`clear_session`](SessionStore::clear_session) removes both.
//!
//! A persisted record that cannot be decoded is treated as "signed out". The
//! store logs it, drops the bad record and carries on; it never fails start-up
//! over it.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::StoreError;
use crate::models::Session;
use crate::storage::Storage;

/// Storage key of the persisted session record.
pub const SESSION_KEY: &str = "user";

/// Page the user lands on when signed in.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Page the user lands on when signed out.
pub const SIGN_IN_PATH: &str = "/sign-in";

/// Process-wide holder of the signed-in identity.
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Restore the session persisted in `storage`, if any.
    ///
    /// Never touches the network and never validates the session with the backend.
    pub fn bootstrap(storage: Arc<dyn Storage>) -> Self {
        let current = load(storage.as_ref());
        Self {
            storage,
            current: RwLock::new(current),
        }
    }

    /// The current session, if signed in.
    pub fn current_session(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replace the current session and persist it.
    ///
    /// The in-memory session is replaced even when persisting fails.
    pub fn set_session(&self, session: Session) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(&session)?;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        self.storage.set_item(SESSION_KEY, &encoded)
    }

    /// Forget the current session and delete the persisted copy.
    pub fn clear_session(&self) -> Result<(), StoreError> {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.storage.remove_item(SESSION_KEY)
    }

    /// Where the entry page sends the user: dashboard if signed in, else sign-in.
    pub fn landing_path(&self) -> &'static str {
        if self.is_authenticated() {
            DASHBOARD_PATH
        } else {
            SIGN_IN_PATH
        }
    }
}

fn load(storage: &dyn Storage) -> Option<Session> {
    let raw = storage.get_item(SESSION_KEY)?;
    match serde_json::from_str::<Session>(&raw) {
        Ok(session) => {
            tracing::debug!(user_id = session.id, "restored persisted session");
            Some(session)
        }
        Err(e) => {
            tracing::warn!("discarding malformed persisted session: {}", e);
            if let Err(e) = storage.remove_item(SESSION_KEY) {
                tracing::warn!("failed to remove malformed session record: {}", e);
            }
            None
        }
    }
}
