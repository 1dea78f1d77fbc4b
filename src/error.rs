use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PennyError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Classifier did not answer within {0:?}")]
    ClassifierTimeout(Duration),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A turn is already in flight for this session.
    #[error("Still answering the previous question")]
    Busy,
}

pub type Result<T> = std::result::Result<T, PennyError>;
