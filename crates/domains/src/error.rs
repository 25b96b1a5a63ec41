//! # AppError
//!
//! The failure kinds a post operation can end in. Adapters decide how each
//! kind is presented; this crate only names them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// The identifier is well formed but no document carries it. Holds the
    /// identifier as the client wrote it.
    #[error("Cannot find post with ID {0}")]
    NotFound(String),

    /// The identifier cannot be parsed into the store's key format.
    #[error("Invalid post ID {0}")]
    InvalidIdentifier(String),

    /// The request body broke one of the body rules.
    #[error("validation error: {0}")]
    Validation(String),

    /// Anything the store reported.
    #[error("store failure: {0}")]
    Store(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
