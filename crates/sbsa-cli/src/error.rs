//! CLI error types

use sbsa_core::{ConfigError, DomainError};
use thiserror::Error;

/// Errors surfaced by the `sbsa` command.
#[derive(Error, Debug)]
pub enum CliError {
    /// Malformed command line
    #[error("{0}\n\nRun `sbsa --help` for usage.")]
    Usage(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A violated addressing or sampling precondition
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize output: {0}")]
    Output(String),
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        CliError::Usage(msg.into())
    }

    /// Process exit code: 1 for domain errors, 2 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Domain(_) => 1,
            _ => 2,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(e: serde_yaml::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let domain = CliError::from(DomainError::NonPositiveStep(0.0));
        assert_eq!(domain.exit_code(), 1);
        assert!(domain.to_string().contains("Quantization step"));

        assert_eq!(CliError::usage("missing command").exit_code(), 2);
        assert_eq!(
            CliError::from(ConfigError::ParseError("bad".into())).exit_code(),
            2
        );
    }
}
