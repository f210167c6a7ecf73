//! # Store crate: the locally cached sign-in state
//!
//! Holds the client's belief about who is signed in. Nothing in here talks to
//! the network: the session is restored from local persistence at start-up and
//! its validity is only discovered by the next authenticated request.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`storage`] | The [`Storage`] key/value trait the session is persisted through |
//! | [`session`] | [`SessionStore`]: bootstrap, replace, clear, read |
//! | [`models`] | [`Session`] and [`Role`] |
//! | [`error`] | [`StoreError`] |

pub mod error;
pub mod models;
pub mod session;
pub mod storage;

mod file_store;
mod memory;

pub use error::StoreError;
pub use file_store::FileStorage;
pub use memory::MemoryStorage;
pub use models::{Role, Session};
pub use session::{SessionStore, SESSION_KEY};
pub use storage::Storage;
