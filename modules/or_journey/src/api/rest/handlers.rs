use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query},
    http::Uri,
    response::Json,
    Extension,
};
use tracing::{error, info};

use crate::api::rest::auth::CurrentPatient;
use crate::api::rest::dto::{
    order_label, EventListDto, EventsQuery, MediaListDto, OperationDto, OperationListDto,
    PhaseListDto, UserDto,
};
use crate::api::rest::error::{bad_request, map_domain_error};
use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::contract::model::{EventOrder, Operation};
use crate::domain::service::Service;

type ApiResult<T> = Result<Json<T>, ProblemResponse>;

fn operation_list(user_id: String, operations: Vec<Operation>) -> OperationListDto {
    let operations: Vec<_> = operations.into_iter().map(Into::into).collect();
    OperationListDto {
        user_id,
        total: operations.len(),
        operations,
    }
}

/// Get a specific patient by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient found", body = UserDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
    uri: Uri,
) -> ApiResult<UserDto> {
    info!("Getting user with id: {}", id);

    match svc.get_user(&id).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            error!("Failed to get user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// List the operations in a patient's case list
#[utoipa::path(
    get,
    path = "/users/{id}/operations",
    tag = "users",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Operations of the patient", body = OperationListDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_user_operations(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
    uri: Uri,
) -> ApiResult<OperationListDto> {
    info!("Listing operations for user: {}", id);

    match svc.list_operations_for_user(&id).await {
        Ok(operations) => Ok(Json(operation_list(id, operations))),
        Err(e) => {
            error!("Failed to list operations for user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get a specific operation by ID
#[utoipa::path(
    get,
    path = "/operations/{id}",
    tag = "operations",
    params(("id" = String, Path, description = "Operation id")),
    responses(
        (status = 200, description = "Operation found", body = OperationDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_operation(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
    uri: Uri,
) -> ApiResult<OperationDto> {
    info!("Getting operation with id: {}", id);

    match svc.get_operation(&id).await {
        Ok(operation) => Ok(Json(OperationDto::from(operation))),
        Err(e) => {
            error!("Failed to get operation {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// List the events of an operation
#[utoipa::path(
    get,
    path = "/operations/{id}/events",
    tag = "operations",
    params(("id" = String, Path, description = "Operation id"), EventsQuery),
    responses(
        (status = 200, description = "Events of the operation", body = EventListDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_events(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
    query: Result<Query<EventsQuery>, QueryRejection>,
    uri: Uri,
) -> ApiResult<EventListDto> {
    let Query(query) = query.map_err(|rejection| bad_request(rejection.body_text(), uri.path()))?;
    info!("Listing events for operation {} with query: {:?}", id, query);

    let order = match query.order.as_deref() {
        None => svc.config().default_event_order,
        Some(raw) => raw
            .parse::<EventOrder>()
            .map_err(|msg| bad_request(msg, uri.path()))?,
    };

    match svc.list_events_for_operation(&id, order).await {
        Ok(events) => {
            let events: Vec<_> = events.into_iter().map(Into::into).collect();
            Ok(Json(EventListDto {
                operation_id: id,
                order: order_label(order).to_string(),
                total: events.len(),
                events,
            }))
        }
        Err(e) => {
            error!("Failed to list events for operation {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// List the events of an operation grouped by phase
#[utoipa::path(
    get,
    path = "/operations/{id}/phases",
    tag = "operations",
    params(("id" = String, Path, description = "Operation id")),
    responses(
        (status = 200, description = "Events grouped by phase", body = PhaseListDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_phases(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
    uri: Uri,
) -> ApiResult<PhaseListDto> {
    match svc.list_events_by_phase(&id).await {
        Ok(groups) => Ok(Json(PhaseListDto {
            operation_id: id,
            phases: groups.into_iter().map(Into::into).collect(),
        })),
        Err(e) => {
            error!("Failed to group events for operation {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// List the images and videos of an operation
#[utoipa::path(
    get,
    path = "/operations/{id}/media",
    tag = "operations",
    params(("id" = String, Path, description = "Operation id")),
    responses(
        (status = 200, description = "Media of the operation", body = MediaListDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_media(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
    uri: Uri,
) -> ApiResult<MediaListDto> {
    match svc.list_media_for_operation(&id).await {
        Ok(items) => {
            let items: Vec<_> = items.into_iter().map(Into::into).collect();
            Ok(Json(MediaListDto {
                operation_id: id,
                total: items.len(),
                items,
            }))
        }
        Err(e) => {
            error!("Failed to list media for operation {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get the authenticated patient
#[utoipa::path(
    get,
    path = "/me",
    tag = "me",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Authenticated patient", body = UserDto),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_me(
    Extension(svc): Extension<Arc<Service>>,
    CurrentPatient(ctx): CurrentPatient,
    uri: Uri,
) -> ApiResult<UserDto> {
    match svc.current_user(&ctx).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            error!("Failed to resolve current user {}: {}", ctx.user_id(), e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// List the operations of the authenticated patient
#[utoipa::path(
    get,
    path = "/me/operations",
    tag = "me",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Operations of the authenticated patient", body = OperationListDto),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_my_operations(
    Extension(svc): Extension<Arc<Service>>,
    CurrentPatient(ctx): CurrentPatient,
    uri: Uri,
) -> ApiResult<OperationListDto> {
    match svc.current_user_operations(&ctx).await {
        Ok(operations) => Ok(Json(operation_list(ctx.user_id().to_string(), operations))),
        Err(e) => {
            error!(
                "Failed to list operations for current user {}: {}",
                ctx.user_id(),
                e
            );
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
