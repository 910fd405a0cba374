use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::api::rest::{dto, handlers, problem};

/// OpenAPI document for the timeline endpoints.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "OR Journey API",
        description = "Read-only timeline of a patient's surgical operations"
    ),
    paths(
        handlers::get_user,
        handlers::list_user_operations,
        handlers::get_operation,
        handlers::list_events,
        handlers::list_phases,
        handlers::list_media,
        handlers::get_me,
        handlers::list_my_operations,
    ),
    components(schemas(
        dto::UserDto,
        dto::OperationDto,
        dto::OperationSummaryDto,
        dto::OperationEventDto,
        dto::OperationListDto,
        dto::EventListDto,
        dto::MediaKindDto,
        dto::MediaItemDto,
        dto::MediaListDto,
        dto::PhaseGroupDto,
        dto::PhaseListDto,
        problem::Problem,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "users", description = "Patients and their case lists"),
        (name = "operations", description = "Operation records and their events"),
        (name = "me", description = "Endpoints scoped to the authenticated patient"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// Render the document as JSON for the ingress `/openapi.json` route.
pub fn openapi_json() -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::to_value(ApiDoc::openapi())?)
}
