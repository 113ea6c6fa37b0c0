//! Error types for configuration loading.
//!
//! The simulation itself has no failure modes; everything that can go wrong
//! happens before a session starts.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for `GameConfig`
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A tuning value is out of range
    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, GameError>;
