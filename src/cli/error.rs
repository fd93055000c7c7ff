//! CLI-level errors (wraps tree, layout and config errors)

use thiserror::Error;

use crate::config::SettingsError;
use crate::errors::{LayoutError, TreeError};

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Layout(#[from] LayoutError),

    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("no node with key {0} in the tree")]
    UnknownKey(i64),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::UnknownKey(_) => crate::exitcode::USAGE,
            CliError::Settings(_) => crate::exitcode::CONFIG,
            CliError::Layout(LayoutError::InvalidMaxDegree(_)) => crate::exitcode::CONFIG,
            CliError::Layout(_) | CliError::Tree(_) => crate::exitcode::DATAERR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_degree_error_when_mapping_then_data_error_exit_code() {
        let err: CliError = LayoutError::from(TreeError::DegreeLimitExceeded {
            key: 2,
            children: 2,
            limit: 2,
        })
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert!(err.to_string().starts_with("degree limit exceeded"));
    }

    #[test]
    fn given_unknown_key_when_mapping_then_usage_exit_code() {
        assert_eq!(CliError::UnknownKey(9).exit_code(), crate::exitcode::USAGE);
    }
}
