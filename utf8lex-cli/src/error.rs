//! Error handling module for the utf8lex CLI.
//!
//! This module provides a custom error type using `thiserror` for structured
//! error handling throughout the front end. `utf8lex_core::LexError` already
//! carries its own taxonomy for anything that goes wrong inside the engine;
//! `CliError` only adds the outer shell around it (config, I/O, usage).

use thiserror::Error;
use utf8lex_core::LexError;

/// Main error type for the utf8lex CLI application.
#[derive(Error, Debug)]
pub enum CliError {
    /// Error when a project configuration file is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Error when CLI-level input validation fails (bad arguments, paths).
    #[error("validation error: {0}")]
    Validation(String),

    /// Error surfaced from `utf8lex-core`: parsing a spec file or building a
    /// lexer from it.
    #[error("{0}")]
    Lex(#[from] LexError),

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config(message: impl Into<String>) -> Self {
        CliError::Config(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::Validation(message.into())
    }
}

/// Result type alias using CliError.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = CliError::config("missing field");
        assert_eq!(err.to_string(), "configuration error: missing field");
    }

    #[test]
    fn validation_error_display() {
        let err = CliError::validation("invalid format");
        assert_eq!(err.to_string(), "validation error: invalid format");
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(matches!(cli_err, CliError::Io(_)));
    }

    #[test]
    fn lex_error_conversion() {
        let lex_err = LexError::EmptyDefinition;
        let cli_err: CliError = lex_err.into();
        assert!(matches!(cli_err, CliError::Lex(_)));
    }
}
