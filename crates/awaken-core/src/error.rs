//! Error types for Awaken

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid speed: {0} (expected 0.5..=5.0 in steps of 0.5)")]
    InvalidSpeed(f64),

    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }
}
