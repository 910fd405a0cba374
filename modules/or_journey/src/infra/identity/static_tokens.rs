use std::collections::HashMap;

use async_trait::async_trait;

use crate::contract::model::PatientCtx;
use crate::domain::ports::IdentityPort;

/// Identity adapter backed by a fixed token → user id table from configuration.
/// Stands in for the external identity provider until token introspection
/// is wired up.
pub struct StaticTokenIdentity {
    tokens: HashMap<String, String>,
}

impl StaticTokenIdentity {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityPort for StaticTokenIdentity {
    async fn resolve_bearer(&self, token: &str) -> Option<PatientCtx> {
        self.tokens.get(token).map(PatientCtx::new)
    }
}
