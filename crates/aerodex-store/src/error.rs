//! Error types for the record store.
//!
//! Persistence failures are fatal to the calling operation; the underlying
//! engine's message is preserved verbatim.

use thiserror::Error;

/// Errors that can occur in the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `open` was called while a connection is already open.
    #[error("Store is already open")]
    AlreadyOpen,

    /// An operation was attempted without an open connection.
    #[error("Store is not open")]
    NotOpen,

    /// SQL error from the underlying engine.
    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// The attribute map column could not be serialized or parsed.
    #[error("Attribute serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored record could not be decoded back into an entry.
    #[error("Invalid record for {path}: {reason}")]
    InvalidRecord {
        /// Path of the offending record.
        path: String,
        /// What was wrong with it.
        reason: String,
    },
}
