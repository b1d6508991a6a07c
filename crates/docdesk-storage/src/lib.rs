//! Document storage abstraction for docdesk.
//!
//! This crate provides a [`DocStore`] trait for reading versioned document
//! trees independent of the underlying backend. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Clean separation** between rendering logic and I/O operations
//!
//! # Identifier Convention
//!
//! All operations take a *version identifier* (e.g. `"10.x"`) and, where
//! applicable, a *document identifier* (e.g. `"installation"`, no `.md`
//! extension). Identifiers are expected to be already normalized (no path
//! separators); backends reject separator-carrying identifiers rather than
//! resolving them.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use docdesk_storage::{DocStore, FsStore};
//!
//! let store = FsStore::new(PathBuf::from("docs"));
//! let markdown = store.read("10.x", "installation")?;
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod store;

pub use fs::FsStore;
#[cfg(feature = "mock")]
pub use mock::MockStore;
pub use store::{DocEntry, DocStore, StoreError};

/// Document identifier of the navigation index within each version tree.
pub const NAV_INDEX: &str = "documentation";
