use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("Invalid item: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, ShelfError>;
