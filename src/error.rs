use std::io;
use thiserror::Error;

use crate::config::settings::ConfigError;

/// Errors that can occur while talking to git
///
/// Only conditions the prompt cannot recover from end up here. A directory
/// outside any repository, or a git command that reports `error:`/`fatal:`
/// on stderr, degrades to "no output" instead.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Failed to execute {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse value: {0}")]
    ParseError(String),
}

/// Top-level application error that wraps all module-specific errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for git operations
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
