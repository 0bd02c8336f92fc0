//! Common types and utilities for utf8lex CLI commands.
//!
//! This module provides shared types, constants, and utility functions
//! used across all command implementations to ensure consistency.

use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

// ============================================================================
// Path Utilities
// ============================================================================

/// Sanitize a user-provided path to prevent path traversal attacks.
///
/// Ensures the resolved path is within the current working directory
/// or an allowed base directory.
///
/// # Security
/// This function protects against:
/// - Directory traversal using `..` components
/// - Symbolic link attacks
/// - Absolute path injection
#[allow(dead_code)]
pub fn sanitize_path(path: &Path, base_dir: Option<&Path>) -> Result<PathBuf> {
    let base = base_dir.unwrap_or_else(|| Path::new("."));
    let base_canonical = base
        .canonicalize()
        .map_err(|e| CliError::validation(format!("invalid base directory: {e}")))?;

    let path_canonical = path.canonicalize().unwrap_or_else(|_| {
        // For non-existent paths, resolve relative to base
        base.join(path).to_path_buf()
    });

    if !path_canonical.starts_with(&base_canonical) {
        return Err(CliError::validation(
            "path traversal detected: path must be within current directory",
        ));
    }

    Ok(path_canonical)
}

// ============================================================================
// Error Messages
// ============================================================================

/// Standard error message templates.
pub mod error_messages {
    pub const SPEC_NOT_FOUND: &str = "spec file does not exist:";
    pub const SPEC_NOT_FILE: &str = "spec path is not a file:";
    pub const TARGET_NOT_DIR: &str = "target path is not a directory:";
    pub const DIR_NOT_EMPTY: &str = "directory is not empty:";
    pub const OUTPUT_PATH_NOT_DIR: &str = "output path's parent is not a directory:";
    pub const UNKNOWN_LANG: &str = "unsupported target language:";
}

// ============================================================================
// Output Messages
// ============================================================================

/// Standard output message templates.
pub mod output_messages {
    pub const INFO: &str = "ℹ️";
    pub const WARNING: &str = "⚠️";
    pub const ERROR: &str = "❌";
    pub const CREATED_DIR: &str = "✅ created directory:";
    pub const CREATED_FILE: &str = "✅ created file:";
    pub const WROTE_OUTPUT: &str = "✅ wrote generated lexer to:";
    pub const CHECK_OK: &str = "✅ spec file is well-formed:";
}
