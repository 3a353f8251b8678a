use core_library::LibraryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{op}: {source}")]
    Library {
        op: &'static str,
        #[source]
        source: LibraryError,
    },

    #[error("Page out of range: page {page} with limit {limit} exceeds {total} couplets")]
    OutOfRange { page: u32, limit: u32, total: usize },

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Track info lookup failed: {0}")]
    Enrichment(String),
}

/// Coarse failure category, used by the transport to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    OutOfRange,
    InvalidInput,
    Internal,
}

impl CoreError {
    pub(crate) fn library(op: &'static str, source: LibraryError) -> Self {
        Self::Library { op, source }
    }

    /// Category of this error. Wrapped repository errors keep their own kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Library { source, .. } => match source {
                LibraryError::NotFound { .. } => ErrorKind::NotFound,
                LibraryError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
                LibraryError::InvalidInput { .. } => ErrorKind::InvalidInput,
                LibraryError::Database(_) | LibraryError::Migration(_) => ErrorKind::Internal,
            },
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::Enrichment(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
