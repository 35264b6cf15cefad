use crate::model::RecordId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordzError {
    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("Could not save '{key}': {reason}")]
    StorageWrite { key: String, reason: String },

    #[error("Import failed: {0}")]
    ImportParse(String),

    #[error("An import is in progress; try again when it finishes")]
    Busy,

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl RecordzError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        RecordzError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecordzError>;
