use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {id}")]
    UserNotFound { id: String },

    #[error("Operation not found: {id}")]
    OperationNotFound { id: String },

    /// Only raised by injected backends; the fixture repository never fails.
    #[error("Repository error: {message}")]
    Repository { message: String },
}

impl DomainError {
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::UserNotFound { id: id.into() }
    }

    pub fn operation_not_found(id: impl Into<String>) -> Self {
        Self::OperationNotFound { id: id.into() }
    }

    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound { .. } | Self::OperationNotFound { .. }
        )
    }
}
