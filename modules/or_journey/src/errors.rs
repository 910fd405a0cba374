//! Error catalog for the or_journey REST surface.
//!
//! Every problem the module can emit is declared here once, so codes and
//! type URLs stay stable across handlers.

use axum::http::StatusCode;

use crate::api::rest::problem::Problem;

/// Static error definition from catalog
#[derive(Debug, Clone, Copy)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
    pub type_url: &'static str,
}

impl ErrDef {
    /// Convert this error definition into a Problem with the given detail
    #[inline]
    pub fn to_problem(&self, detail: impl Into<String>) -> Problem {
        Problem::new(
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            self.title,
            detail.into(),
        )
        .coded(self.code, self.type_url)
    }
}

pub const USER_NOT_FOUND: ErrDef = ErrDef {
    status: 404,
    title: "User not found",
    code: "OR_JOURNEY_USER_NOT_FOUND",
    type_url: "https://errors.or-journey.dev/OR_JOURNEY_USER_NOT_FOUND",
};

pub const OPERATION_NOT_FOUND: ErrDef = ErrDef {
    status: 404,
    title: "Operation not found",
    code: "OR_JOURNEY_OPERATION_NOT_FOUND",
    type_url: "https://errors.or-journey.dev/OR_JOURNEY_OPERATION_NOT_FOUND",
};

pub const UNAUTHORIZED: ErrDef = ErrDef {
    status: 401,
    title: "Unauthorized",
    code: "OR_JOURNEY_UNAUTHORIZED",
    type_url: "https://errors.or-journey.dev/OR_JOURNEY_UNAUTHORIZED",
};

pub const BAD_REQUEST: ErrDef = ErrDef {
    status: 400,
    title: "Bad Request",
    code: "OR_JOURNEY_BAD_REQUEST",
    type_url: "https://errors.or-journey.dev/OR_JOURNEY_BAD_REQUEST",
};

pub const INTERNAL: ErrDef = ErrDef {
    status: 500,
    title: "Internal error",
    code: "OR_JOURNEY_INTERNAL",
    type_url: "https://errors.or-journey.dev/OR_JOURNEY_INTERNAL",
};

/// All catalog entries, for docs and tests.
pub const ALL: [ErrDef; 5] = [
    USER_NOT_FOUND,
    OPERATION_NOT_FOUND,
    UNAUTHORIZED,
    BAD_REQUEST,
    INTERNAL,
];
