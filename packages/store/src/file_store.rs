//! # Filesystem-backed storage
//!
//! [`FileStorage`] is a [`Storage`] implementation that keeps each key in its
//! own file, so the signed-in session survives process restarts on native hosts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── <key>          # raw value, e.g. `user` holds the session JSON
//! ```
//!
//! ## Platform data directories
//!
//! [`FileStorage::default_location`] uses [`dirs::data_dir()`]:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/clubhub/` |
//! | Linux | `~/.local/share/clubhub/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\clubhub\` |

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::storage::Storage;

/// Filesystem-backed Storage for native hosts.
#[derive(Clone, Debug)]
pub struct FileStorage {
    base: PathBuf,
}

impl FileStorage {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    /// `<data_dir>/clubhub`, or `None` when the platform has no data directory.
    pub fn default_location() -> Option<Self> {
        dirs::data_dir().map(|dir| Self::new(dir.join("clubhub")))
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn item_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\']);
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.base.join(key))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let path = self.item_path(key).ok()?;
        std::fs::read_to_string(path).ok()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.item_path(key)?;
        std::fs::create_dir_all(&self.base)?;
        std::fs::write(path, value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let path = self.item_path(key)?;
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("clubhub"));

        storage.set_item("user", r#"{"id":1}"#).unwrap();

        // Re-open from same directory
        let reopened = FileStorage::new(dir.path().join("clubhub"));
        assert_eq!(reopened.get_item("user").as_deref(), Some(r#"{"id":1}"#));

        reopened.remove_item("user").unwrap();
        assert!(storage.get_item("user").is_none());
        reopened.remove_item("user").unwrap();
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf());

        for key in ["", "..", "a/b", "a\\b"] {
            assert!(matches!(
                storage.set_item(key, "x"),
                Err(StoreError::InvalidKey(_))
            ));
            assert!(storage.get_item(key).is_none());
        }
    }
}
