use async_trait::async_trait;

use crate::contract::{
    error::OrJourneyError,
    model::{EventOrder, MediaItem, Operation, OperationEvent, PatientCtx, PhaseGroup, User},
};

/// Public API trait for the or_journey module that other modules can use
#[async_trait]
pub trait OrJourneyApi: Send + Sync {
    /// Get a patient by ID
    async fn get_user(&self, id: &str) -> Result<User, OrJourneyError>;

    /// Get an operation with its full event sequence
    async fn get_operation(&self, id: &str) -> Result<Operation, OrJourneyError>;

    /// List the events of an operation in the requested order
    async fn list_events_for_operation(
        &self,
        id: &str,
        order: EventOrder,
    ) -> Result<Vec<OperationEvent>, OrJourneyError>;

    /// Resolve a patient's cases into operations, in case-list order
    async fn list_operations_for_user(&self, user_id: &str)
        -> Result<Vec<Operation>, OrJourneyError>;

    /// Images and videos of an operation, in storage order
    async fn list_media_for_operation(&self, id: &str) -> Result<Vec<MediaItem>, OrJourneyError>;

    /// Events grouped by phase
    async fn list_events_by_phase(&self, id: &str) -> Result<Vec<PhaseGroup>, OrJourneyError>;

    /// The authenticated patient
    async fn current_user(&self, ctx: &PatientCtx) -> Result<User, OrJourneyError>;

    /// Operations of the authenticated patient, in case-list order
    async fn current_user_operations(
        &self,
        ctx: &PatientCtx,
    ) -> Result<Vec<Operation>, OrJourneyError>;
}
