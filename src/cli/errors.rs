//! CLI-specific error types
//!
//! All CLI errors are fatal: the process prints the error and exits non-zero.

use std::io;

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("DMLSEM_CLI_CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    #[error("DMLSEM_CLI_CATALOG_ERROR: {0}")]
    Catalog(#[from] CatalogError),

    #[error("DMLSEM_CLI_IO_ERROR: {0}")]
    Io(#[from] io::Error),

    #[error("DMLSEM_CLI_REQUEST_ERROR: Malformed statement: {0}")]
    Request(#[from] serde_json::Error),

    #[error("DMLSEM_CLI_REQUEST_ERROR: {0}")]
    EmptyRequest(String),

    /// Statement analyzed and rejected; the plan has already been printed
    #[error("DMLSEM_CLI_STATEMENT_REJECTED: {code}")]
    Rejected { code: String },
}

impl CliError {
    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        match self {
            CliError::Config(_) => "DMLSEM_CLI_CONFIG_ERROR",
            CliError::Catalog(_) => "DMLSEM_CLI_CATALOG_ERROR",
            CliError::Io(_) => "DMLSEM_CLI_IO_ERROR",
            CliError::Request(_) | CliError::EmptyRequest(_) => "DMLSEM_CLI_REQUEST_ERROR",
            CliError::Rejected { .. } => "DMLSEM_CLI_STATEMENT_REJECTED",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code() {
        let err = CliError::EmptyRequest("Empty input".into());
        assert_eq!(err.code_str(), "DMLSEM_CLI_REQUEST_ERROR");
        assert_eq!(err.to_string(), "DMLSEM_CLI_REQUEST_ERROR: Empty input");

        let err = CliError::from(ConfigError::Invalid("bad".into()));
        assert!(err.to_string().starts_with("DMLSEM_CLI_CONFIG_ERROR: "));
    }
}
