use crate::api::rest::problem::ProblemResponse;
use crate::domain::error::DomainError;
use crate::errors::{self, ErrDef};

/// Build a ProblemResponse from a catalog entry
pub fn from_catalog(def: &ErrDef, detail: impl Into<String>, instance: &str) -> ProblemResponse {
    ProblemResponse(def.to_problem(detail).at(instance).traced())
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::UserNotFound { id } => from_catalog(
            &errors::USER_NOT_FOUND,
            format!("User with id {id} was not found"),
            instance,
        ),
        DomainError::OperationNotFound { id } => from_catalog(
            &errors::OPERATION_NOT_FOUND,
            format!("Operation with id {id} was not found"),
            instance,
        ),
        DomainError::Repository { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Repository error occurred");
            from_catalog(
                &errors::INTERNAL,
                "An internal error occurred while reading timeline data",
                instance,
            )
        }
    }
}

pub fn unauthorized(detail: impl Into<String>, instance: &str) -> ProblemResponse {
    from_catalog(&errors::UNAUTHORIZED, detail, instance)
}

pub fn bad_request(detail: impl Into<String>, instance: &str) -> ProblemResponse {
    from_catalog(&errors::BAD_REQUEST, detail, instance)
}
