use async_trait::async_trait;

use crate::contract::model::PatientCtx;

/// Transport-agnostic identity port: maps a bearer token issued by the
/// external identity provider to the patient it belongs to.
///
/// Returns `None` for tokens it does not recognise.
#[async_trait]
pub trait IdentityPort: Send + Sync {
    async fn resolve_bearer(&self, token: &str) -> Option<PatientCtx>;
}
