use async_trait::async_trait;

use crate::contract::model::{Operation, User};

/// Port for the domain layer: the read-only lookups the timeline needs.
/// Object-safe and async-friendly via `async_trait`, so a remote backend can
/// replace the fixture dataset without touching callers.
#[async_trait]
pub trait TimelineRepository: Send + Sync {
    /// Load a patient by id.
    async fn find_user(&self, id: &str) -> anyhow::Result<Option<User>>;
    /// Load an operation (with its events) by id.
    async fn find_operation(&self, id: &str) -> anyhow::Result<Option<Operation>>;
}
