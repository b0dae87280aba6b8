// Input source handling for the diylisp-repl binary

use clap::ValueEnum;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Where program text comes from
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSource {
    /// Interactive REPL mode
    Interactive,
    /// Execute a string directly
    String,
    /// Execute a file
    File,
    /// Read from stdin pipe
    Pipe,
}

/// Configuration for input handling
#[derive(Debug, Clone)]
pub struct InputConfig {
    pub source: InputSource,
    pub file_path: Option<PathBuf>,
    pub string_content: Option<String>,
}

impl InputConfig {
    pub fn from_file(file_path: PathBuf) -> Self {
        Self {
            source: InputSource::File,
            file_path: Some(file_path),
            string_content: None,
        }
    }

    pub fn from_string(content: String) -> Self {
        Self {
            source: InputSource::String,
            file_path: None,
            string_content: Some(content),
        }
    }

    pub fn from_pipe() -> Self {
        Self {
            source: InputSource::Pipe,
            file_path: None,
            string_content: None,
        }
    }
}

/// Result of reading input content
#[derive(Debug)]
pub struct InputContent {
    pub content: String,
    pub source_name: String,
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("--file argument required when using --input file")]
    MissingFileArgument,

    #[error("--string argument required when using --input string")]
    MissingStringArgument,

    #[error("Error reading file '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error reading from stdin: {0}")]
    StdinRead(#[source] io::Error),

    #[error("Interactive mode has no content to read up front")]
    InteractiveNotSupported,
}

/// Read input content based on the configuration
pub fn read_input_content(config: &InputConfig) -> Result<InputContent, InputError> {
    match config.source {
        InputSource::File => {
            let file_path = config
                .file_path
                .as_ref()
                .ok_or(InputError::MissingFileArgument)?;
            debug!(path = %file_path.display(), "reading program file");
            let content = fs::read_to_string(file_path).map_err(|source| InputError::FileRead {
                path: file_path.clone(),
                source,
            })?;
            Ok(InputContent {
                content,
                source_name: file_path.to_string_lossy().to_string(),
            })
        }
        InputSource::String => {
            let content = config
                .string_content
                .as_ref()
                .ok_or(InputError::MissingStringArgument)?
                .clone();
            Ok(InputContent {
                content,
                source_name: "<string>".to_string(),
            })
        }
        InputSource::Pipe => {
            let mut content = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut content)
                .map_err(InputError::StdinRead)?;
            Ok(InputContent {
                content,
                source_name: "<stdin>".to_string(),
            })
        }
        InputSource::Interactive => Err(InputError::InteractiveNotSupported),
    }
}

/// Validate input arguments for a given source type
pub fn validate_input_args(
    source: InputSource,
    file_path: &Option<PathBuf>,
    string_content: &Option<String>,
) -> Result<(), InputError> {
    match source {
        InputSource::File if file_path.is_none() => Err(InputError::MissingFileArgument),
        InputSource::String if string_content.is_none() => Err(InputError::MissingStringArgument),
        _ => Ok(()),
    }
}
