//! Error types used across nicswap.
use thiserror::Error;

/// High-level error categories for type-level operations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("invalid address")]
    InvalidAddress,
    #[error("duplicate address")]
    DuplicateAddress,
    #[error("plan error")]
    Plan,
}

/// Structured error with a kind and human message.
#[derive(Debug, Error)]
#[error("{kind}: {msg}")]
pub struct Error {
    pub kind: ErrorKind,
    pub msg: String,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
        }
    }
}

/// Convenient alias for results returning a `types::Error`.
pub type Result<T> = std::result::Result<T, Error>;
