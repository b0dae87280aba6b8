//! Interpreter configuration
//!
//! Loaded from an optional TOML file; every key may be omitted. Command line flags of the
//! `diylisp-repl` binary override values read from the file.

use crate::runtime::DEFAULT_MAX_RECURSION_DEPTH;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Interpreter configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Maximum nesting of closure applications before evaluation fails with a stack overflow
    pub max_recursion_depth: usize,
    /// Whether the prelude is evaluated into the top-level environment at startup
    pub load_prelude: bool,
    /// Prelude file to load instead of the built-in one
    pub prelude_path: Option<PathBuf>,
    /// REPL prompt
    pub prompt: String,
    /// REPL history file
    pub history_file: Option<PathBuf>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            load_prelude: true,
            prelude_path: None,
            prompt: "→  ".to_string(),
            history_file: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl InterpreterConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: InterpreterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_recursion_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_recursion_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
