//! CLI error types.

use folio_compiler::CompileError;
use folio_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{path}: {source}")]
    Compile {
        path: String,
        #[source]
        source: CompileError,
    },

    #[error("{0}")]
    Validation(String),
}
