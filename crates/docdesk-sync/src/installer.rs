//! Archive installation: extraction and document tree replacement.
//!
//! An archive is extracted into a staging directory under the storage root,
//! then swapped in through renames only. The previous tree is parked at a
//! retired path during the swap and restored if the swap fails, so a
//! version directory never disappears on a failed install.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

/// Staging area under the storage root; same filesystem as the targets so
/// the final rename is atomic.
const STAGING_DIR: &str = ".staging";

/// Parking area for the previous tree during the swap.
const RETIRED_DIR: &str = ".retired";

/// Error installing a version archive.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// Archive could not be opened or read. The target tree is untouched.
    #[error("Archive for {version} is unreadable: {message}")]
    Archive {
        /// Version identifier.
        version: String,
        /// Underlying zip error message.
        message: String,
    },
    /// Extracted archive holds no files.
    #[error("Archive for {version} is empty")]
    EmptyArchive {
        /// Version identifier.
        version: String,
    },
    /// I/O error during extraction or swap.
    #[error("Installing {version} failed: {source}")]
    Io {
        /// Version identifier.
        version: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Installs extracted archives into the storage root.
pub struct Installer {
    root: PathBuf,
}

impl Installer {
    /// Create an installer writing into `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Extract `archive` and swap it in as the tree for `version`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::Archive`] if the archive cannot be opened —
    /// in that case the existing tree for `version` is left untouched.
    /// Returns [`InstallError::Io`] on extraction or swap failures.
    pub fn install(&self, version: &str, archive: &Path) -> Result<(), InstallError> {
        let staging = self.root.join(STAGING_DIR).join(version);
        let result = self.extract_and_swap(version, archive, &staging);
        // Staging leftovers go away on every exit path
        let _ = fs::remove_dir_all(&staging);
        result
    }

    fn extract_and_swap(
        &self,
        version: &str,
        archive: &Path,
        staging: &Path,
    ) -> Result<(), InstallError> {
        let archive_err = |message: String| InstallError::Archive {
            version: version.to_owned(),
            message,
        };
        let io_err = |source: io::Error| InstallError::Io {
            version: version.to_owned(),
            source,
        };

        // Open before touching the target: an unreadable archive must leave
        // the existing tree as it was.
        let file = File::open(archive).map_err(|e| archive_err(e.to_string()))?;
        let mut zip =
            ZipArchive::new(io::BufReader::new(file)).map_err(|e| archive_err(e.to_string()))?;

        if staging.exists() {
            fs::remove_dir_all(staging).map_err(io_err)?;
        }
        fs::create_dir_all(staging).map_err(io_err)?;

        for i in 0..zip.len() {
            let mut entry = zip.by_index(i).map_err(|e| archive_err(e.to_string()))?;
            let Some(rel) = entry.enclosed_name() else {
                tracing::warn!(version, name = entry.name(), "skipping unsafe archive entry");
                continue;
            };
            let dest = staging.join(rel);
            if entry.is_dir() {
                fs::create_dir_all(&dest).map_err(io_err)?;
            } else {
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent).map_err(io_err)?;
                }
                let mut out = File::create(&dest).map_err(io_err)?;
                io::copy(&mut entry, &mut out).map_err(io_err)?;
            }
        }

        let tree = Self::extracted_tree(version, staging)?;
        self.swap_in(version, &tree)
    }

    /// Locate the extracted document tree inside the staging directory.
    ///
    /// Archives conventionally carry a single top-level folder named after
    /// the upstream snapshot (e.g. `docs-10.x/`); flat archives fall back to
    /// the staging directory itself.
    fn extracted_tree(version: &str, staging: &Path) -> Result<PathBuf, InstallError> {
        let entries: Vec<PathBuf> = fs::read_dir(staging)
            .map_err(|source| InstallError::Io {
                version: version.to_owned(),
                source,
            })?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .collect();

        match entries.as_slice() {
            [] => Err(InstallError::EmptyArchive {
                version: version.to_owned(),
            }),
            [single] if single.is_dir() => Ok(single.clone()),
            _ => Ok(staging.to_path_buf()),
        }
    }

    /// Replace the target tree through renames only.
    fn swap_in(&self, version: &str, tree: &Path) -> Result<(), InstallError> {
        let io_err = |source: io::Error| InstallError::Io {
            version: version.to_owned(),
            source,
        };

        let target = self.root.join(version);
        let retired = self.root.join(RETIRED_DIR).join(version);

        if retired.exists() {
            fs::remove_dir_all(&retired).map_err(io_err)?;
        }
        if let Some(parent) = retired.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let had_previous = target.exists();
        if had_previous {
            fs::rename(&target, &retired).map_err(io_err)?;
        }

        if let Err(e) = fs::rename(tree, &target) {
            if had_previous {
                // Put the previous tree back so the version stays readable
                let _ = fs::rename(&retired, &target);
            }
            return Err(io_err(e));
        }

        if had_previous {
            let _ = fs::remove_dir_all(&retired);
        }

        tracing::info!(version, "document tree installed");
        Ok(())
    }
}
