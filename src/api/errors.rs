use thiserror::Error;

use crate::adapters::CloudError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("resolution failed: {0}")]
    Resolve(#[from] CloudError),
    #[error("preconditions not met: {}", .0.join("; "))]
    Precondition(Vec<String>),
    #[error("plan error: {0}")]
    Plan(String),
}

impl ApiError {
    #[must_use]
    pub const fn id(&self) -> ErrorId {
        match self {
            ApiError::Config(_) => ErrorId::E_CONFIG,
            ApiError::Resolve(_) => ErrorId::E_RESOLVE,
            ApiError::Precondition(_) => ErrorId::E_PRECONDITION,
            ApiError::Plan(_) => ErrorId::E_PLAN,
        }
    }
}

impl From<crate::types::errors::Error> for ApiError {
    fn from(e: crate::types::errors::Error) -> Self {
        use crate::types::errors::ErrorKind::{DuplicateAddress, InvalidAddress, Plan};
        match e.kind {
            InvalidAddress | DuplicateAddress => ApiError::Config(e.msg),
            Plan => ApiError::Plan(e.msg),
        }
    }
}

// Stable identifiers emitted in facts.
// We intentionally keep SCREAMING_SNAKE_CASE to match emitted IDs.
#[allow(non_camel_case_types, reason = "Error IDs are emitted verbatim")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorId {
    E_CONFIG,
    E_RESOLVE,
    E_PRECONDITION,
    E_PLAN,
    E_FORWARD,
    E_ROLLBACK,
    E_CLEANUP,
}

#[must_use]
pub const fn id_str(id: ErrorId) -> &'static str {
    match id {
        ErrorId::E_CONFIG => "E_CONFIG",
        ErrorId::E_RESOLVE => "E_RESOLVE",
        ErrorId::E_PRECONDITION => "E_PRECONDITION",
        ErrorId::E_PLAN => "E_PLAN",
        ErrorId::E_FORWARD => "E_FORWARD",
        ErrorId::E_ROLLBACK => "E_ROLLBACK",
        ErrorId::E_CLEANUP => "E_CLEANUP",
    }
}
