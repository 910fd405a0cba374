use std::fmt;

use thiserror::Error;

/// Which kind of record a lookup failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    User,
    Operation,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("User"),
            Self::Operation => f.write_str("Operation"),
        }
    }
}

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrJourneyError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    #[error("Internal error")]
    Internal,
}

impl OrJourneyError {
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: RecordKind::User,
            id: id.into(),
        }
    }

    pub fn operation_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: RecordKind::Operation,
            id: id.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<crate::domain::error::DomainError> for OrJourneyError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            UserNotFound { id } => Self::user_not_found(id),
            OperationNotFound { id } => Self::operation_not_found(id),
            Repository { .. } => Self::internal(),
        }
    }
}
