use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::contract::model::{
    EventOrder, MediaItem, Operation, OperationEvent, PatientCtx, PhaseGroup, User,
};
use crate::domain::error::DomainError;
use crate::domain::repo::TimelineRepository;
use crate::domain::timeline;

/// Domain service exposing the timeline lookups.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn TimelineRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Order used by transports that do not ask for one explicitly.
    pub default_event_order: EventOrder,
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(repo: Arc<dyn TimelineRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    #[instrument(name = "or_journey.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: &str) -> Result<User, DomainError> {
        debug!("Getting user by id");

        let user = self
            .repo
            .find_user(id)
            .await
            .map_err(|e| DomainError::repository(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(id))?;
        debug!(cases = user.cases.len(), "Successfully retrieved user");
        Ok(user)
    }

    #[instrument(
        name = "or_journey.service.get_operation",
        skip(self),
        fields(operation_id = %id)
    )]
    pub async fn get_operation(&self, id: &str) -> Result<Operation, DomainError> {
        debug!("Getting operation by id");

        let operation = self
            .repo
            .find_operation(id)
            .await
            .map_err(|e| DomainError::repository(e.to_string()))?
            .ok_or_else(|| DomainError::operation_not_found(id))?;
        debug!(
            events = operation.events.len(),
            "Successfully retrieved operation"
        );
        Ok(operation)
    }

    #[instrument(
        name = "or_journey.service.list_events_for_operation",
        skip(self),
        fields(operation_id = %id, order = ?order)
    )]
    pub async fn list_events_for_operation(
        &self,
        id: &str,
        order: EventOrder,
    ) -> Result<Vec<OperationEvent>, DomainError> {
        let operation = self.get_operation(id).await?;
        Ok(timeline::ordered_events(&operation.events, order))
    }

    /// Resolve the patient's cases in case-list order. A case id with no
    /// matching operation is a dangling reference: it is logged and skipped.
    #[instrument(
        name = "or_journey.service.list_operations_for_user",
        skip(self),
        fields(user_id = %user_id)
    )]
    pub async fn list_operations_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Operation>, DomainError> {
        let user = self.get_user(user_id).await?;

        let mut operations = Vec::with_capacity(user.cases.len());
        for case_id in &user.cases {
            let found = self
                .repo
                .find_operation(case_id)
                .await
                .map_err(|e| DomainError::repository(e.to_string()))?;
            match found {
                Some(operation) => operations.push(operation),
                None => warn!(case_id = %case_id, "Case references unknown operation; skipping"),
            }
        }

        debug!("Resolved {} of {} cases", operations.len(), user.cases.len());
        Ok(operations)
    }

    #[instrument(
        name = "or_journey.service.list_media_for_operation",
        skip(self),
        fields(operation_id = %id)
    )]
    pub async fn list_media_for_operation(&self, id: &str) -> Result<Vec<MediaItem>, DomainError> {
        let operation = self.get_operation(id).await?;
        Ok(timeline::media_items(&operation.events))
    }

    #[instrument(
        name = "or_journey.service.list_events_by_phase",
        skip(self),
        fields(operation_id = %id)
    )]
    pub async fn list_events_by_phase(&self, id: &str) -> Result<Vec<PhaseGroup>, DomainError> {
        let operation = self.get_operation(id).await?;
        Ok(timeline::group_by_phase(&operation.events))
    }

    #[instrument(
        name = "or_journey.service.current_user",
        skip(self, ctx),
        fields(user_id = %ctx.user_id())
    )]
    pub async fn current_user(&self, ctx: &PatientCtx) -> Result<User, DomainError> {
        self.get_user(ctx.user_id()).await
    }

    #[instrument(
        name = "or_journey.service.current_user_operations",
        skip(self, ctx),
        fields(user_id = %ctx.user_id())
    )]
    pub async fn current_user_operations(
        &self,
        ctx: &PatientCtx,
    ) -> Result<Vec<Operation>, DomainError> {
        self.list_operations_for_user(ctx.user_id()).await
    }
}
