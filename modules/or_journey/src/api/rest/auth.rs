use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::api::rest::error::unauthorized;
use crate::api::rest::problem::ProblemResponse;
use crate::contract::model::PatientCtx;
use crate::domain::ports::IdentityPort;

/// Extractor producing the authenticated patient for the request.
///
/// Reads `Authorization: Bearer <token>` and resolves it through the
/// `IdentityPort` installed as a router extension. Anything else is a 401.
#[derive(Debug, Clone)]
pub struct CurrentPatient(pub PatientCtx);

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for CurrentPatient
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let instance = parts.uri.path().to_string();

        let identity = parts
            .extensions
            .get::<Arc<dyn IdentityPort>>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("IdentityPort extension is not installed");
                unauthorized("Authentication is not configured", &instance)
            })?;

        let Some(token) = bearer_token(parts) else {
            return Err(unauthorized("Missing bearer token", &instance));
        };

        match identity.resolve_bearer(token).await {
            Some(ctx) => {
                tracing::debug!(user_id = %ctx.user_id(), "Resolved bearer token");
                Ok(Self(ctx))
            }
            None => Err(unauthorized("Bearer token is not recognised", &instance)),
        }
    }
}
