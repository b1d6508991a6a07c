//! Archive fetching and document tree installation for docdesk.
//!
//! This crate drives the sync pipeline: for every version in the configured
//! catalog, fetch its archive, extract it, and swap the extracted tree into
//! the storage root.
//!
//! # Architecture
//!
//! - [`Fetcher`]: single-attempt streaming download to a temporary file
//! - [`Installer`]: zip extraction into a staging path, rename-only swap
//! - [`Syncer`]: fans the catalog out over a bounded worker pool and
//!   aggregates per-version outcomes into a [`SyncReport`]
//!
//! A failure in one version's pipeline never aborts the others; the report
//! carries every outcome so the caller can surface partial failures after
//! the full catalog pass. Temporary archives are removed on every exit path
//! because the fetcher hands out RAII file handles scoped to each task.
//!
//! # Example
//!
//! ```ignore
//! use docdesk_config::Config;
//! use docdesk_sync::Syncer;
//!
//! let config = Config::load(None, None)?;
//! let syncer = Syncer::new(
//!     config.versions.clone(),
//!     config.storage_resolved.root.clone(),
//!     &config.sync,
//! );
//! let report = syncer.sync();
//! ```

mod fetcher;
mod installer;

use std::path::PathBuf;
use std::time::Duration;

use docdesk_config::{SyncConfig, VersionSource};
use rayon::prelude::*;

pub use fetcher::{FetchError, Fetcher};
pub use installer::{InstallError, Installer};

/// Error in one version's fetch-and-install pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Archive retrieval failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// Archive extraction or tree swap failed.
    #[error(transparent)]
    Install(#[from] InstallError),
}

/// Outcome of syncing one catalog version.
#[derive(Debug)]
pub struct VersionOutcome {
    /// Version identifier.
    pub version: String,
    /// Pipeline result for this version.
    pub result: Result<(), SyncError>,
}

/// Aggregated outcomes of a full catalog pass, in catalog order.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Per-version outcomes.
    pub outcomes: Vec<VersionOutcome>,
}

impl SyncReport {
    /// True if every version synced successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Number of versions that synced successfully.
    #[must_use]
    pub fn synced(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Failed versions with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &SyncError)> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.result {
                Ok(()) => None,
                Err(e) => Some((o.version.as_str(), e)),
            })
    }
}

/// Sync orchestrator over an immutable version catalog.
pub struct Syncer {
    catalog: Vec<VersionSource>,
    fetcher: Fetcher,
    installer: Installer,
    max_parallel: usize,
}

impl Syncer {
    /// Create a syncer for the given catalog and storage root.
    ///
    /// Temporary archives live under `<root>/.tmp` so all transient
    /// artifacts stay inside the storage root.
    #[must_use]
    pub fn new(catalog: Vec<VersionSource>, root: PathBuf, sync: &SyncConfig) -> Self {
        Self {
            fetcher: Fetcher::new(Duration::from_secs(sync.timeout_secs), root.join(".tmp")),
            installer: Installer::new(root),
            max_parallel: sync.max_parallel,
            catalog,
        }
    }

    /// Sync every catalog version and report per-version outcomes.
    ///
    /// Versions run on a bounded worker pool; each version's tree is an
    /// independent resource, while fetch and install for a single version
    /// stay sequential within its task.
    #[must_use]
    pub fn sync(&self) -> SyncReport {
        if self.catalog.is_empty() {
            return SyncReport::default();
        }

        let threads = self.max_parallel.min(self.catalog.len());
        let outcomes = match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(|| {
                self.catalog
                    .par_iter()
                    .map(|source| self.sync_version(source))
                    .collect()
            }),
            Err(e) => {
                // Degrade to sequential execution rather than failing the sync
                tracing::warn!(error = %e, "worker pool unavailable, syncing sequentially");
                self.catalog
                    .iter()
                    .map(|source| self.sync_version(source))
                    .collect()
            }
        };

        let report = SyncReport { outcomes };
        tracing::info!(
            synced = report.synced(),
            failed = report.outcomes.len() - report.synced(),
            "catalog sync finished"
        );
        report
    }

    /// Fetch and install one version.
    fn sync_version(&self, source: &VersionSource) -> VersionOutcome {
        let result = (|| -> Result<(), SyncError> {
            // The archive handle is scoped to this closure: the temporary
            // file is removed whether installation succeeds or fails.
            let archive = self.fetcher.fetch(&source.id, &source.url)?;
            self.installer.install(&source.id, archive.path())?;
            Ok(())
        })();

        if let Err(e) = &result {
            tracing::error!(version = %source.id, error = %e, "version sync failed");
        }

        VersionOutcome {
            version: source.id.clone(),
            result,
        }
    }
}
