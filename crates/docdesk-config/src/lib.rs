//! Configuration management for docdesk.
//!
//! Parses `docdesk.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! The configuration is loaded once at startup and injected into the
//! sync and view layers; nothing here is mutated after load.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `versions[].url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docdesk.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override document storage root.
    pub storage_root: Option<PathBuf>,
    /// Override fetch timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Override maximum parallel version syncs.
    pub max_parallel: Option<usize>,
}

/// One catalog entry: a supported version and its archive source.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct VersionSource {
    /// Version identifier (e.g. "10.x").
    pub id: String,
    /// URL of the zip archive holding this version's document tree.
    pub url: String,
}

/// Initial view selected at startup.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InitialView {
    /// Initially selected version.
    pub version: String,
    /// Initially selected document.
    pub doc: String,
}

impl Default for InitialView {
    fn default() -> Self {
        Self {
            version: "10.x".to_owned(),
            doc: "installation".to_owned(),
        }
    }
}

/// Sync tuning parameters.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SyncConfig {
    /// Timeout for each archive fetch, in seconds.
    pub timeout_secs: u64,
    /// Maximum number of versions synced in parallel.
    pub max_parallel: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_parallel: 4,
        }
    }
}

/// Raw storage configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StorageConfigRaw {
    root: Option<String>,
}

/// Resolved storage configuration with an absolute root path.
#[derive(Debug, Default, Clone)]
pub struct StorageConfig {
    /// Root directory holding one subdirectory per version.
    pub root: PathBuf,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Version catalog: ordered (id, url) pairs iterated by the syncer.
    pub versions: Vec<VersionSource>,
    /// Initial view.
    pub initial: InitialView,
    /// Sync tuning.
    pub sync: SyncConfig,
    /// Storage configuration (paths are relative strings from TOML).
    storage: StorageConfigRaw,

    /// Resolved storage configuration (set after loading).
    #[serde(skip)]
    pub storage_resolved: StorageConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Default catalog: the upstream branches the original application tracked.
fn default_catalog() -> Vec<VersionSource> {
    ["10.x", "9.x", "8.x", "7.x"]
        .into_iter()
        .map(|id| VersionSource {
            id: id.to_owned(),
            url: format!("https://github.com/laravel/docs/archive/refs/heads/{id}.zip"),
        })
        .collect()
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`versions[0].url`").
        field: String,
        /// Error message (e.g., "${`DOCS_MIRROR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docdesk.toml` in current directory and parents,
    /// falling back to defaults when no file exists.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(root) = &settings.storage_root {
            self.storage_resolved.root.clone_from(root);
        }
        if let Some(timeout) = settings.timeout_secs {
            self.sync.timeout_secs = timeout;
        }
        if let Some(max_parallel) = settings.max_parallel {
            self.sync.max_parallel = max_parallel;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            versions: default_catalog(),
            initial: InitialView::default(),
            sync: SyncConfig::default(),
            storage: StorageConfigRaw::default(),
            storage_resolved: StorageConfig {
                root: base.join("docs"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        if config.versions.is_empty() {
            config.versions = default_catalog();
        }

        // Expand environment variables before validation
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Expand environment variables in archive URLs.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for (i, source) in self.versions.iter_mut().enumerate() {
            source.url = expand::expand_env(&source.url, &format!("versions[{i}].url"))?;
        }
        Ok(())
    }

    /// Resolve relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let root = self.storage.root.as_deref().unwrap_or("docs");
        let root = PathBuf::from(root);
        self.storage_resolved.root = if root.is_absolute() {
            root
        } else {
            config_dir.join(root)
        };
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any catalog entry is malformed
    /// or sync tuning values are out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, source) in self.versions.iter().enumerate() {
            require_non_empty(&source.id, &format!("versions[{i}].id"))?;
            if source.id.contains('/') || source.id.contains('\\') {
                return Err(ConfigError::Validation(format!(
                    "versions[{i}].id must not contain path separators"
                )));
            }
            require_non_empty(&source.url, &format!("versions[{i}].url"))?;
            require_http_url(&source.url, &format!("versions[{i}].url"))?;
        }
        if self.sync.max_parallel == 0 {
            return Err(ConfigError::Validation(
                "sync.max_parallel must be at least 1".to_owned(),
            ));
        }
        if self.sync.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "sync.timeout_secs must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_catalog() {
        let config = Config::default();
        assert_eq!(config.versions.len(), 4);
        assert_eq!(config.versions[0].id, "10.x");
        assert_eq!(
            config.versions[0].url,
            "https://github.com/laravel/docs/archive/refs/heads/10.x.zip"
        );
        assert_eq!(config.initial.version, "10.x");
        assert_eq!(config.initial.doc, "installation");
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/docdesk.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[storage]
root = "archive"

[initial]
version = "9.x"
doc = "readme"

[sync]
timeout_secs = 5
max_parallel = 2

[[versions]]
id = "9.x"
url = "https://example.com/9.x.zip"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.versions.len(), 1);
        assert_eq!(config.versions[0].id, "9.x");
        assert_eq!(config.initial.version, "9.x");
        assert_eq!(config.sync.timeout_secs, 5);
        assert_eq!(config.sync.max_parallel, 2);
        assert_eq!(config.storage_resolved.root, dir.path().join("archive"));
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_empty_catalog_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[storage]\nroot = \"docs\"\n");

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.versions.len(), 4);
    }

    #[test]
    fn test_cli_settings_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[[versions]]
id = "10.x"
url = "https://example.com/10.x.zip"
"#,
        );

        let settings = CliSettings {
            storage_root: Some(PathBuf::from("/tmp/docs-override")),
            timeout_secs: Some(60),
            max_parallel: Some(1),
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(
            config.storage_resolved.root,
            PathBuf::from("/tmp/docs-override")
        );
        assert_eq!(config.sync.timeout_secs, 60);
        assert_eq!(config.sync.max_parallel, 1);
    }

    #[test]
    fn test_validate_rejects_separator_in_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[[versions]]
id = "docs/10.x"
url = "https://example.com/10.x.zip"
"#,
        );

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[[versions]]
id = "10.x"
url = "ftp://example.com/10.x.zip"
"#,
        );

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_zero_parallel() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[sync]
max_parallel = 0

[[versions]]
id = "10.x"
url = "https://example.com/10.x.zip"
"#,
        );

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_absolute_storage_root_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[storage]
root = "/var/lib/docdesk/docs"

[[versions]]
id = "10.x"
url = "https://example.com/10.x.zip"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(
            config.storage_resolved.root,
            PathBuf::from("/var/lib/docdesk/docs")
        );
    }
}
