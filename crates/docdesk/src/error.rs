//! CLI error types.

use docdesk_config::ConfigError;
use docdesk_renderer::RenderError;
use docdesk_storage::StoreError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Sync(String),
}
