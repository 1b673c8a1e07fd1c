//! store::errors
//!
//! Typed failure categories for object store operations.
//!
//! The categorization matters to callers: the walker tolerates
//! [`StoreError::NotFound`] (skips the subtree, records the id) but a
//! [`StoreError::Corrupt`] object aborts the whole pass.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::TypeError;

/// Errors from object store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Not inside a git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Object absent from the store.
    #[error("object not found: {id}")]
    NotFound {
        /// The id that was not found
        id: String,
    },

    /// Object present but undecodable.
    #[error("corrupt object {id}: {message}")]
    Corrupt {
        /// The id of the corrupt object
        id: String,
        /// Description of the problem
        message: String,
    },

    /// Malformed object id.
    #[error("invalid object id: {message}")]
    InvalidId {
        /// Description of the problem
        message: String,
    },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    Access {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl StoreError {
    /// Create a StoreError from a git2::Error with the id or ref under
    /// operation as context.
    pub(crate) fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => StoreError::NotFound {
                id: context.to_string(),
            },
            git2::ErrorCode::InvalidSpec => StoreError::InvalidId {
                message: context.to_string(),
            },
            git2::ErrorCode::Locked => StoreError::Access {
                message: format!("repository is locked: {}", err.message()),
            },
            // libgit2 reports undecodable loose/packed objects through the
            // odb, object, or zlib error class rather than a dedicated code
            _ if err.class() == git2::ErrorClass::Odb
                || err.class() == git2::ErrorClass::Object
                || err.class() == git2::ErrorClass::Zlib =>
            {
                StoreError::Corrupt {
                    id: context.to_string(),
                    message: err.message().to_string(),
                }
            }
            _ => StoreError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<TypeError> for StoreError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidObjectId(msg) => StoreError::InvalidId { message: msg },
        }
    }
}
