//! Filesystem storage implementation.
//!
//! Provides [`FsStore`] for reading versioned document trees from the local
//! storage root, with mtime-based caching for title extraction.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use regex::Regex;

use crate::store::{DocEntry, DocStore, StoreError};

/// Cached file metadata for incremental title extraction.
#[derive(Clone, Debug)]
struct CachedFile {
    /// File modification time.
    mtime: SystemTime,
    /// Extracted title from the file.
    title: String,
}

/// Filesystem storage implementation.
///
/// Reads documents from `<root>/<version>/<doc>.md`. Titles come from the
/// first H1 heading, with mtime caching to avoid re-reading unchanged files.
pub struct FsStore {
    /// Root directory holding one subdirectory per version.
    root: PathBuf,
    /// Regex for extracting first H1 heading.
    h1_regex: Regex,
    /// Mtime cache for incremental title extraction.
    mtime_cache: Mutex<HashMap<PathBuf, CachedFile>>,
}

impl FsStore {
    /// Create a new filesystem store rooted at `root`.
    ///
    /// # Panics
    ///
    /// Panics if the internal regex for H1 heading extraction fails to compile.
    /// This should never happen as the regex is a compile-time constant.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            h1_regex: Regex::new(r"(?m)^#\s+(.+)$").unwrap(),
            mtime_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Storage root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reject identifiers that could escape the storage root.
    ///
    /// Identifiers arrive normalized (substring after the last separator), so
    /// anything still carrying a separator or traversal component is refused
    /// rather than resolved.
    fn validate_id(id: &str) -> Result<(), StoreError> {
        if id.is_empty() || id.contains('/') || id.contains('\\') || id == "." || id == ".." {
            return Err(StoreError::InvalidId(id.to_owned()));
        }
        Ok(())
    }

    /// Absolute path of one document.
    fn doc_path(&self, version: &str, doc: &str) -> Result<PathBuf, StoreError> {
        Self::validate_id(version)?;
        Self::validate_id(doc)?;
        Ok(self.root.join(version).join(format!("{doc}.md")))
    }

    /// Get title for a file, using mtime cache when possible.
    fn get_title(&self, file_path: &Path, fallback: &str) -> String {
        let current_mtime = fs::metadata(file_path).ok().and_then(|m| m.modified().ok());

        if let Some(mtime) = current_mtime {
            let cache = self.mtime_cache.lock().unwrap();
            if let Some(cached) = cache.get(file_path) {
                if cached.mtime == mtime {
                    return cached.title.clone();
                }
            }
        }

        let title = fs::read_to_string(file_path)
            .ok()
            .and_then(|content| {
                self.h1_regex
                    .captures(&content)
                    .map(|c| c[1].trim().to_owned())
            })
            .unwrap_or_else(|| fallback.to_owned());

        if let Some(mtime) = current_mtime {
            let mut cache = self.mtime_cache.lock().unwrap();
            cache.insert(
                file_path.to_path_buf(),
                CachedFile {
                    mtime,
                    title: title.clone(),
                },
            );
        }

        title
    }
}

impl DocStore for FsStore {
    fn read(&self, version: &str, doc: &str) -> Result<String, StoreError> {
        let path = self.doc_path(version, doc)?;
        fs::read_to_string(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::NotFound {
                    version: version.to_owned(),
                    doc: doc.to_owned(),
                }
            } else {
                StoreError::Io(e)
            }
        })
    }

    fn exists(&self, version: &str, doc: &str) -> bool {
        self.doc_path(version, doc)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    fn versions(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            // Missing root means nothing has been synced yet
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut versions: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| !name.starts_with('.'))
            .collect();
        versions.sort();
        Ok(versions)
    }

    fn scan(&self, version: &str) -> Result<Vec<DocEntry>, StoreError> {
        Self::validate_id(version)?;
        let dir = self.root.join(version);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::VersionNotFound {
                    version: version.to_owned(),
                });
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut docs = Vec::new();
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|e| e != "md") {
                continue;
            }
            let Some(doc) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if doc.starts_with('.') {
                continue;
            }
            let title = self.get_title(&path, doc);
            docs.push(DocEntry {
                doc: doc.to_owned(),
                title,
            });
        }
        docs.sort_by(|a, b| a.doc.cmp(&b.doc));

        tracing::debug!(version, count = docs.len(), "scanned document tree");
        Ok(docs)
    }
}
