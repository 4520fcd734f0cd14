use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MnkyError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Directory not found: {}", crate::core::paths::clean_path_str(.0))]
    DirectoryNotFound(String),

    #[error("Configuration not found: {0}")]
    ConfigurationNotFound(String),

    #[error("{0}")]
    Generic(String),
}

impl From<String> for MnkyError {
    fn from(msg: String) -> Self {
        MnkyError::Generic(msg)
    }
}

impl From<&str> for MnkyError {
    fn from(msg: &str) -> Self {
        MnkyError::Generic(msg.to_string())
    }
}
