use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tracing::{info, warn};

use crate::api::rest::{openapi, routes};
use crate::config::OrJourneyConfig;
use crate::contract::client::OrJourneyApi;
use crate::domain::ports::IdentityPort;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::OrJourneyLocalClient;
use crate::infra::identity::StaticTokenIdentity;
use crate::infra::storage::{DatasetSummary, FixtureTimelineRepository};

/// The or_journey module: dataset, domain service, identity and client.
#[derive(Clone)]
pub struct OrJourney {
    service: Arc<Service>,
    identity: Arc<dyn IdentityPort>,
    client: Arc<dyn OrJourneyApi>,
    summary: DatasetSummary,
    issues: Vec<String>,
}

impl OrJourney {
    /// Load the dataset named by the config (or the built-in one) and wire
    /// the service, identity adapter and local client around it.
    pub fn init(cfg: &OrJourneyConfig) -> anyhow::Result<Self> {
        let repo = load_repository(cfg)?;

        let issues = repo.integrity_issues();
        for issue in &issues {
            warn!(issue = %issue, "Dataset integrity issue");
        }
        let summary = repo.summary();
        info!(
            users = summary.users,
            operations = summary.operations,
            events = summary.events,
            "Timeline dataset loaded"
        );

        let service_config = ServiceConfig {
            default_event_order: cfg.event_order()?,
        };
        let service = Arc::new(Service::new(Arc::new(repo), service_config));

        let identity = StaticTokenIdentity::new(cfg.tokens.clone());
        if identity.is_empty() {
            warn!("No bearer tokens configured; /me endpoints will answer 401");
        } else {
            info!(tokens = identity.len(), "Static bearer tokens configured");
        }

        let client: Arc<dyn OrJourneyApi> = Arc::new(OrJourneyLocalClient::new(service.clone()));

        info!("or_journey module initialized");
        Ok(Self {
            service,
            identity: Arc::new(identity),
            client,
            summary,
            issues,
        })
    }

    /// Client for in-process consumers.
    pub fn client(&self) -> Arc<dyn OrJourneyApi> {
        self.client.clone()
    }

    pub fn summary(&self) -> DatasetSummary {
        self.summary
    }

    /// Referential and range problems found in the dataset at load time.
    pub fn integrity_issues(&self) -> &[String] {
        &self.issues
    }

    /// Mount the REST routes onto `router`.
    pub fn register_rest(&self, router: Router) -> anyhow::Result<Router> {
        routes::register_routes(router, self.service.clone(), self.identity.clone())
    }

    /// OpenAPI document for the mounted routes.
    pub fn openapi(&self) -> anyhow::Result<serde_json::Value> {
        openapi::openapi_json()
    }
}

fn load_repository(cfg: &OrJourneyConfig) -> anyhow::Result<FixtureTimelineRepository> {
    match cfg.dataset_path.as_deref() {
        Some(path) => {
            info!(path = %path, "Loading timeline dataset from file");
            FixtureTimelineRepository::from_path(path)
        }
        None => FixtureTimelineRepository::builtin(),
    }
    .context("failed to initialize or_journey dataset")
}
