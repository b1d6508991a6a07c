//! Mock storage for testing.

use std::collections::HashMap;

use crate::store::{DocEntry, DocStore, StoreError};

/// In-memory store for tests.
///
/// # Example
///
/// ```ignore
/// use docdesk_storage::{DocStore, MockStore};
///
/// let store = MockStore::new()
///     .with_content("10.x", "installation", "# Installation\n\nIntro.");
/// assert!(store.exists("10.x", "installation"));
/// ```
#[derive(Default)]
pub struct MockStore {
    contents: HashMap<(String, String), String>,
}

impl MockStore {
    /// Create an empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document with the given content.
    #[must_use]
    pub fn with_content(mut self, version: &str, doc: &str, content: &str) -> Self {
        self.contents
            .insert((version.to_owned(), doc.to_owned()), content.to_owned());
        self
    }

    /// First H1 heading of the given content, if any.
    fn h1(content: &str) -> Option<String> {
        content
            .lines()
            .find_map(|line| line.strip_prefix("# "))
            .map(|rest| rest.trim().to_owned())
    }
}

impl DocStore for MockStore {
    fn read(&self, version: &str, doc: &str) -> Result<String, StoreError> {
        self.contents
            .get(&(version.to_owned(), doc.to_owned()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                version: version.to_owned(),
                doc: doc.to_owned(),
            })
    }

    fn exists(&self, version: &str, doc: &str) -> bool {
        self.contents
            .contains_key(&(version.to_owned(), doc.to_owned()))
    }

    fn versions(&self) -> Result<Vec<String>, StoreError> {
        let mut versions: Vec<String> = self.contents.keys().map(|(v, _)| v.clone()).collect();
        versions.sort();
        versions.dedup();
        Ok(versions)
    }

    fn scan(&self, version: &str) -> Result<Vec<DocEntry>, StoreError> {
        let mut docs: Vec<DocEntry> = self
            .contents
            .iter()
            .filter(|((v, _), _)| v == version)
            .map(|((_, doc), content)| DocEntry {
                doc: doc.clone(),
                title: Self::h1(content).unwrap_or_else(|| doc.clone()),
            })
            .collect();
        if docs.is_empty() {
            return Err(StoreError::VersionNotFound {
                version: version.to_owned(),
            });
        }
        docs.sort_by(|a, b| a.doc.cmp(&b.doc));
        Ok(docs)
    }
}
