//! Error kinds returned by the engine and by plugins
//!
//! Every variant carries the name or path it concerns so a front-end can render
//! a distinct message without parsing strings.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by [`crate::TextEngine`] and its collaborators
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("plugin not found: {0}")]
    PluginNotFound(String),

    #[error("plugin '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("plugin '{0}' is disabled")]
    Disabled(String),

    #[error("error applying plugin '{plugin}': {source}")]
    PluginFailure {
        plugin: String,
        #[source]
        source: PluginFailure,
    },

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("command '{command}' requires {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("empty command")]
    EmptyCommand,

    #[error("no file path provided and no current file path exists")]
    MissingPath,

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("{} is not valid {encoding}", path.display())]
    Decode { path: PathBuf, encoding: String },

    #[error("{} cannot be encoded as {encoding}", path.display())]
    Encode { path: PathBuf, encoding: String },
}

impl EngineError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure raised by a plugin while validating arguments or processing text
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PluginFailure {
    #[error("invalid value '{value}' for option '{option}': {reason}")]
    InvalidOption {
        option: String,
        value: String,
        reason: String,
    },

    #[error("missing required option '{0}'")]
    MissingOption(String),

    #[error("invalid {option}: {value}")]
    UnknownMode { option: String, value: String },

    #[error("{0}")]
    Other(String),
}
