//! Error types for settings files

use thiserror::Error;

/// Settings loading and saving errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings definition: {0}")]
    Json(#[from] serde_json::Error),

    /// No category or setting has this key
    #[error("Unknown setting key: {0}")]
    UnknownKey(String),
}

/// Result type for settings operations
pub type Result<T> = std::result::Result<T, SettingsError>;
