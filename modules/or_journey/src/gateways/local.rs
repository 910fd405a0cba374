use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::OrJourneyApi,
    error::OrJourneyError,
    model::{EventOrder, MediaItem, Operation, OperationEvent, PatientCtx, PhaseGroup, User},
};
use crate::domain::service::Service;

/// Local implementation of the OrJourneyApi trait that delegates to the domain service
pub struct OrJourneyLocalClient {
    service: Arc<Service>,
}

impl OrJourneyLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl OrJourneyApi for OrJourneyLocalClient {
    async fn get_user(&self, id: &str) -> Result<User, OrJourneyError> {
        self.service.get_user(id).await.map_err(Into::into)
    }

    async fn get_operation(&self, id: &str) -> Result<Operation, OrJourneyError> {
        self.service.get_operation(id).await.map_err(Into::into)
    }

    async fn list_events_for_operation(
        &self,
        id: &str,
        order: EventOrder,
    ) -> Result<Vec<OperationEvent>, OrJourneyError> {
        self.service
            .list_events_for_operation(id, order)
            .await
            .map_err(Into::into)
    }

    async fn list_operations_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Operation>, OrJourneyError> {
        self.service
            .list_operations_for_user(user_id)
            .await
            .map_err(Into::into)
    }

    async fn list_media_for_operation(&self, id: &str) -> Result<Vec<MediaItem>, OrJourneyError> {
        self.service
            .list_media_for_operation(id)
            .await
            .map_err(Into::into)
    }

    async fn list_events_by_phase(&self, id: &str) -> Result<Vec<PhaseGroup>, OrJourneyError> {
        self.service
            .list_events_by_phase(id)
            .await
            .map_err(Into::into)
    }

    async fn current_user(&self, ctx: &PatientCtx) -> Result<User, OrJourneyError> {
        self.service.current_user(ctx).await.map_err(Into::into)
    }

    async fn current_user_operations(
        &self,
        ctx: &PatientCtx,
    ) -> Result<Vec<Operation>, OrJourneyError> {
        self.service
            .current_user_operations(ctx)
            .await
            .map_err(Into::into)
    }
}
