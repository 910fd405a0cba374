use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::api::rest::handlers;
use crate::domain::ports::IdentityPort;
use crate::domain::service::Service;

pub fn register_routes(
    mut router: Router,
    service: Arc<Service>,
    identity: Arc<dyn IdentityPort>,
) -> anyhow::Result<Router> {
    // GET /users/{id} - Get a specific patient
    router = router.route("/users/{id}", get(handlers::get_user));

    // GET /users/{id}/operations - Operations in the patient's case list
    router = router.route(
        "/users/{id}/operations",
        get(handlers::list_user_operations),
    );

    // GET /operations/{id} - Get a specific operation
    router = router.route("/operations/{id}", get(handlers::get_operation));

    // GET /operations/{id}/events?order=stored|chronological
    router = router.route("/operations/{id}/events", get(handlers::list_events));

    // GET /operations/{id}/phases - Events grouped by phase
    router = router.route("/operations/{id}/phases", get(handlers::list_phases));

    // GET /operations/{id}/media - Images and videos
    router = router.route("/operations/{id}/media", get(handlers::list_media));

    // GET /me, /me/operations - Scoped to the bearer token's patient
    router = router
        .route("/me", get(handlers::get_me))
        .route("/me/operations", get(handlers::list_my_operations));

    router = router
        .layer(Extension(service))
        .layer(Extension(identity));

    tracing::debug!("Registered or_journey REST routes");
    Ok(router)
}
