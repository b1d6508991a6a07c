//! Store trait and error types.

/// One document inside a version tree, as returned by [`DocStore::scan`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocEntry {
    /// Document identifier (filename without `.md` extension).
    pub doc: String,
    /// Document title (first H1 heading, or the identifier as fallback).
    pub title: String,
}

/// Storage error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Requested document does not exist under the given version.
    #[error("Document not found: {version}/{doc}")]
    NotFound {
        /// Version identifier.
        version: String,
        /// Document identifier.
        doc: String,
    },
    /// No document tree exists for the given version.
    #[error("No document tree for version {version}")]
    VersionNotFound {
        /// Version identifier.
        version: String,
    },
    /// Identifier contains path separators or traversal components.
    #[error("Invalid identifier: {0:?}")]
    InvalidId(String),
    /// I/O error from the backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read access to versioned document trees.
///
/// The syncer writes trees through its own filesystem path; everything that
/// renders reads through this trait, so tests can substitute a mock backend.
pub trait DocStore: Send + Sync {
    /// Read the raw markdown of one document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the document does not exist,
    /// [`StoreError::InvalidId`] if an identifier carries path separators.
    fn read(&self, version: &str, doc: &str) -> Result<String, StoreError>;

    /// Check whether a document exists.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, version: &str, doc: &str) -> bool;

    /// List installed version identifiers, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the storage root cannot be listed.
    fn versions(&self) -> Result<Vec<String>, StoreError>;

    /// List documents of one version with their titles, sorted by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VersionNotFound`] if the version has no tree.
    fn scan(&self, version: &str) -> Result<Vec<DocEntry>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StoreError::NotFound {
            version: "10.x".to_owned(),
            doc: "missing".to_owned(),
        };
        assert_eq!(err.to_string(), "Document not found: 10.x/missing");
    }

    #[test]
    fn test_invalid_id_display() {
        let err = StoreError::InvalidId("../etc".to_owned());
        assert_eq!(err.to_string(), "Invalid identifier: \"../etc\"");
    }

    #[test]
    fn test_store_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoreError>();
    }
}
