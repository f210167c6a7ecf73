//! Key/value persistence for client-side state.

use crate::error::StoreError;

/// Synchronous string key/value storage, in the shape of browser local storage.
///
/// Implementations: [`crate::MemoryStorage`] (process memory) and
/// [`crate::FileStorage`] (one file per key on disk).
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}
