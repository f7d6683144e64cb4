use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("embedding backend unavailable: {0}")]
    EncoderUnavailable(String),

    #[error("document already indexed: {0}")]
    DuplicateDocument(String),

    #[error("document not found: {0}")]
    DocumentNotFound(String),

    #[error("persisted store unreadable: {0}")]
    PersistenceCorrupt(String),

    #[error("query failed: {0}")]
    QueryFailure(String),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
