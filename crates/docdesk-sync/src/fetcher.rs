//! Archive fetching.
//!
//! Retrieves one version's archive from its configured URL and persists it
//! to a temporary file keyed by version. A single attempt is made per sync;
//! there is no retry or backoff.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::NamedTempFile;
use ureq::Agent;

/// Error fetching a version archive.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Request failed: transport error or non-2xx status.
    #[error("Fetching {version} from {url} failed: {source}")]
    Http {
        /// Version identifier.
        version: String,
        /// Archive URL.
        url: String,
        /// Underlying HTTP error.
        #[source]
        source: Box<ureq::Error>,
    },
    /// Writing the archive to the temporary file failed.
    #[error("Writing archive for {version} failed: {source}")]
    Write {
        /// Version identifier.
        version: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Archive fetcher with a shared HTTP agent.
///
/// The agent carries a global timeout so a stalled download cannot hang the
/// sync indefinitely.
pub struct Fetcher {
    agent: Agent,
    temp_dir: PathBuf,
}

impl Fetcher {
    /// Create a fetcher writing temporary archives into `temp_dir`.
    #[must_use]
    pub fn new(timeout: Duration, temp_dir: PathBuf) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent, temp_dir }
    }

    /// Fetch the archive for one version into a temporary file.
    ///
    /// The response body is streamed to disk. The returned handle deletes
    /// the file when dropped, so cleanup happens on every exit path of the
    /// caller, success or failure.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] on transport failure or non-2xx status,
    /// [`FetchError::Write`] if the archive cannot be written.
    pub fn fetch(&self, version: &str, url: &str) -> Result<NamedTempFile, FetchError> {
        tracing::info!(version, url, "fetching archive");

        let response = self.agent.get(url).call().map_err(|e| FetchError::Http {
            version: version.to_owned(),
            url: url.to_owned(),
            source: Box::new(e),
        })?;

        let write_err = |source: io::Error| FetchError::Write {
            version: version.to_owned(),
            source,
        };

        std::fs::create_dir_all(&self.temp_dir).map_err(write_err)?;
        let mut archive = tempfile::Builder::new()
            .prefix(&format!("{version}-"))
            .suffix(".zip")
            .tempfile_in(&self.temp_dir)
            .map_err(write_err)?;

        let mut body = response.into_body().into_reader();
        let bytes = io::copy(&mut body, &mut archive).map_err(write_err)?;

        tracing::debug!(version, bytes, "archive written");
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_connection_refused() {
        let dir = tempfile::tempdir().unwrap();
        // Bind then drop a listener so the port is known-closed
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let fetcher = Fetcher::new(Duration::from_secs(1), dir.path().to_path_buf());
        let err = fetcher
            .fetch("10.x", &format!("http://127.0.0.1:{port}/10.x.zip"))
            .unwrap_err();

        assert!(matches!(err, FetchError::Http { ref version, .. } if version == "10.x"));
    }

    #[test]
    fn test_temp_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let file = tempfile::Builder::new()
                .prefix("10.x-")
                .suffix(".zip")
                .tempfile_in(dir.path())
                .unwrap();
            file.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
