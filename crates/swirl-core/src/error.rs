//! Error types for swirl

use thiserror::Error;

/// The main error type for swirl operations
#[derive(Debug, Error)]
pub enum SwirlError {
    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Render error: {0}")]
    Render(String),
}

/// Result type alias for swirl operations
pub type Result<T> = std::result::Result<T, SwirlError>;

impl From<toml::de::Error> for SwirlError {
    fn from(err: toml::de::Error) -> Self {
        SwirlError::TomlParse(err.to_string())
    }
}
