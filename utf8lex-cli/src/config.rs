//! Project configuration for the utf8lex CLI.
//!
//! A project's `generate`/`check` invocations don't need to repeat the same
//! spec path, templates directory, output path and target language on every
//! call: `utf8lex.toml`, if present, supplies defaults that CLI arguments
//! override. Unlike a per-user config, this file is always project-local —
//! it is searched for in the current directory and its ancestors only, never
//! under a home or system config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// Default project configuration file name.
pub const CONFIG_FILE_NAME: &str = "utf8lex.toml";

/// Project configuration for generating a lexer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Path to the spec file, relative to the config file's directory.
    #[serde(default = "default_spec")]
    pub spec: String,

    /// Directory holding code-emission templates.
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    /// Where generated lexer source is written.
    #[serde(default = "default_output")]
    pub output: String,

    /// Target host language (`rust`, `c`, ...).
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_spec() -> String {
    ".utf8lex".to_string()
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

fn default_output() -> String {
    "lexer.rs".to_string()
}

fn default_lang() -> String {
    "rust".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spec: default_spec(),
            templates_dir: default_templates_dir(),
            output: default_output(),
            lang: default_lang(),
        }
    }
}

impl Config {
    /// Load configuration by searching the current directory and its
    /// ancestors for `utf8lex.toml`. Returns the default configuration if
    /// none is found.
    pub fn load() -> Result<Self> {
        match Self::find_config_file()? {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::config(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| CliError::config(format!("failed to parse configuration: {e}")))?;

        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::config(format!("failed to serialize configuration: {e}")))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Walk from the current directory upward looking for `utf8lex.toml`.
    fn find_config_file() -> Result<Option<PathBuf>> {
        let mut dir = std::env::current_dir()?;
        loop {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                return Ok(Some(candidate));
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }
}
