use crate::domain::model::RowId;
use thiserror::Error;

/// Failure of a single save attempt. Never retried.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Save request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Endpoint rejected save with status {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Error, Debug)]
pub enum DrrError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV rendering error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Edit script error: {0}")]
    ScriptError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load rows: {message}")]
    LoadError { message: String },

    #[error("No row with id {id}")]
    UnknownRow { id: RowId },

    #[error(transparent)]
    SaveError(#[from] SaveError),
}

pub type Result<T> = std::result::Result<T, DrrError>;
