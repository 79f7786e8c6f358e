//! # Error Types
//!
//! Every fallible core operation returns [`CoreError`].

use crate::UserId;
use thiserror::Error;

/// Errors raised while parsing interactions or ranking items.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The underlying reader failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input had no header line.
    #[error("input is empty: expected a header with user_id,item_id[,rating]")]
    EmptyInput,

    /// Required columns are absent from the header.
    #[error("CSV must contain columns user_id, item_id; missing: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// A data row has an empty user or item id.
    #[error("line {line}: rows must contain user_id and item_id")]
    MissingId { line: usize },

    /// A line could not be split into fields.
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// The requested user never appears in the interactions.
    #[error("unknown user_id: {0}")]
    UnknownUser(UserId),
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
