//! Error types for the E2E runner

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Unknown test group: {0}")]
    UnknownGroup(String),

    #[error("Failed to launch test engine `{program}`: {source}")]
    LaunchFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
