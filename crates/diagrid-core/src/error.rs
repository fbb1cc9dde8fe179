//! Error types shared by the editing core.

use crate::document::ItemId;
use thiserror::Error;

/// Errors raised by commands, interactions and configuration loading.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),
    #[error("Item {0} cannot be deleted")]
    NotDeletable(ItemId),
    #[error("Invalid command state: {0}")]
    InvalidCommandState(String),
    #[error("Clipboard error: {0}")]
    Clipboard(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Editor error: {0}")]
    Other(String),
}

/// Result type for editing operations.
pub type EditorResult<T> = Result<T, EditorError>;
