use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use or_journey::{
    api::rest::dto::{EventListDto, MediaKindDto, MediaListDto, OperationDto, OperationListDto, PhaseListDto, UserDto},
    config::OrJourneyConfig,
    contract::{client::OrJourneyApi, error::OrJourneyError, model::EventOrder, model::PatientCtx},
    domain::service::{Service, ServiceConfig},
    gateways::local::OrJourneyLocalClient,
    infra::{identity::StaticTokenIdentity, storage::FixtureTimelineRepository},
    OrJourney,
};

const MARY: &str = "516e0881-4012-49ea-a8f8-276d1b424b02";
const JOHN: &str = "a2b3c4d5-6789-0123-4567-89abcdef0123";
const ALICE: &str = "b3c4d5e6-7890-1234-5678-90abcdef1234";
const RESECTION: &str = "2fa35c90-4fad-4bc1-886e-cad4cf1f2591";
const CRANIOTOMY: &str = "96e978ad-261d-4134-96bd-21ddc2b815a2";
const MENINGIOMA_2: &str = "41114a51-7413-40f0-ab74-75b903a2392b";

/// Create a test domain service over the built-in dataset
fn create_test_service() -> Arc<Service> {
    let repo = FixtureTimelineRepository::builtin().expect("built-in dataset loads");
    Arc::new(Service::new(Arc::new(repo), ServiceConfig::default()))
}

/// Create a test local client
fn create_test_client() -> Arc<dyn OrJourneyApi> {
    Arc::new(OrJourneyLocalClient::new(create_test_service()))
}

/// Create a test HTTP router with one token per known patient
fn create_test_router() -> Router {
    let tokens = HashMap::from([
        ("mary-token".to_string(), MARY.to_string()),
        ("ghost-token".to_string(), "no-such-user".to_string()),
    ]);
    or_journey::api::rest::routes::register_routes(
        Router::new(),
        create_test_service(),
        Arc::new(StaticTokenIdentity::new(tokens)),
    )
    .expect("Failed to register routes")
}

async fn get(router: Router, uri: &str, token: Option<&str>) -> Result<(StatusCode, String, serde_json::Value)> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    let response = router.oneshot(builder.body(Body::empty())?).await?;
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, content_type, serde_json::from_slice(&body)?))
}

#[tokio::test]
async fn get_user_returns_mary_jones() -> Result<()> {
    let service = create_test_service();

    let user = service.get_user(MARY).await?;
    assert_eq!(user.name, "Mary Jones");
    assert_eq!(user.cases, vec![RESECTION.to_string()]);
    Ok(())
}

#[tokio::test]
async fn get_operation_returns_resection_with_fourteen_events() -> Result<()> {
    let service = create_test_service();

    let op = service.get_operation(RESECTION).await?;
    assert_eq!(op.procedure, "Surgical Resection of Right Motor Strip Tumor");
    assert_eq!(op.events.len(), 14);
    Ok(())
}

#[tokio::test]
async fn unknown_ids_are_not_found_for_every_lookup() {
    let client = create_test_client();

    let err = client.get_operation("does-not-exist").await.unwrap_err();
    assert_eq!(err, OrJourneyError::operation_not_found("does-not-exist"));

    assert!(client.get_user("does-not-exist").await.unwrap_err().is_not_found());
    for order in [EventOrder::Stored, EventOrder::Chronological] {
        let err = client
            .list_events_for_operation("does-not-exist", order)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
    assert!(client
        .list_media_for_operation("does-not-exist")
        .await
        .unwrap_err()
        .is_not_found());
    assert!(client
        .list_events_by_phase("")
        .await
        .unwrap_err()
        .is_not_found());

    let err = client
        .list_operations_for_user("does-not-exist")
        .await
        .unwrap_err();
    assert_eq!(err, OrJourneyError::user_not_found("does-not-exist"));

    let err = client
        .current_user_operations(&PatientCtx::new("does-not-exist"))
        .await
        .unwrap_err();
    assert_eq!(err, OrJourneyError::user_not_found("does-not-exist"));
}

#[tokio::test]
async fn every_case_resolves_to_an_operation() -> Result<()> {
    let client = create_test_client();

    for user_id in [MARY, JOHN, ALICE] {
        let user = client.get_user(user_id).await?;
        for case in &user.cases {
            let op = client.get_operation(case).await?;
            assert_eq!(&op.id, case);
        }
    }
    Ok(())
}

#[tokio::test]
async fn stored_order_matches_operation_events() -> Result<()> {
    let client = create_test_client();

    for id in [RESECTION, MENINGIOMA_2, CRANIOTOMY] {
        let op = client.get_operation(id).await?;
        assert_eq!(op.id, id);
        let events = client.list_events_for_operation(id, EventOrder::Stored).await?;
        assert_eq!(events, op.events);
        // Repeated calls are deterministic
        let again = client.list_events_for_operation(id, EventOrder::Stored).await?;
        assert_eq!(events, again);
    }
    Ok(())
}

#[tokio::test]
async fn chronological_order_is_a_stable_sort() -> Result<()> {
    let client = create_test_client();

    let op = client.get_operation(CRANIOTOMY).await?;
    let events = client
        .list_events_for_operation(CRANIOTOMY, EventOrder::Chronological)
        .await?;

    assert_eq!(events.len(), op.events.len());
    assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let ids: Vec<&str> = events.iter().map(|e| e.event_id.as_str()).collect();
    // e10 is stored after e09 but happened at 08:15, after e05/e06
    assert_eq!(&ids[4..8], &["96e978ad-e05", "96e978ad-e06", "96e978ad-e10", "96e978ad-e07"]);
    // e12 (09:45) moves ahead of e11 (10:00)
    assert_eq!(&ids[10..12], &["96e978ad-e12", "96e978ad-e11"]);
    Ok(())
}

#[tokio::test]
async fn operations_for_user_follow_case_order() -> Result<()> {
    let client = create_test_client();

    let ops = client.list_operations_for_user(JOHN).await?;
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].id, CRANIOTOMY);

    assert!(client.list_operations_for_user(ALICE).await?.is_empty());
    assert!(client
        .list_operations_for_user("does-not-exist")
        .await
        .unwrap_err()
        .is_not_found());
    Ok(())
}

#[tokio::test]
async fn media_lists_images_and_videos_in_stored_order() -> Result<()> {
    let client = create_test_client();

    let media = client.list_media_for_operation(RESECTION).await?;
    let ids: Vec<&str> = media.iter().map(|m| m.event_id.as_str()).collect();
    assert_eq!(
        ids,
        [
            "2fa35c90-e03",
            "2fa35c90-e04",
            "2fa35c90-e06",
            "2fa35c90-e07",
            "2fa35c90-e08",
            "2fa35c90-e10",
            "2fa35c90-e12",
        ]
    );
    let warned: Vec<&str> = media
        .iter()
        .filter(|m| m.content_warning)
        .map(|m| m.event_id.as_str())
        .collect();
    assert_eq!(warned, ["2fa35c90-e06", "2fa35c90-e07", "2fa35c90-e08"]);
    Ok(())
}

#[tokio::test]
async fn phases_group_in_first_seen_order() -> Result<()> {
    let client = create_test_client();

    let groups = client.list_events_by_phase(RESECTION).await?;
    let summary: Vec<(String, usize)> = groups
        .iter()
        .map(|g| (g.phase.to_string(), g.events.len()))
        .collect();
    assert_eq!(
        summary,
        [
            ("Pre Operative".to_string(), 1),
            ("Intraoperative".to_string(), 10),
            ("Post Operative".to_string(), 3),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn current_user_comes_from_explicit_context() -> Result<()> {
    let client = create_test_client();

    let user = client.current_user(&PatientCtx::new(JOHN)).await?;
    assert_eq!(user.name, "John Smith");

    let err = client
        .current_user(&PatientCtx::new("unknown"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let ops = client.current_user_operations(&PatientCtx::new(MARY)).await?;
    let ids: Vec<&str> = ops.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, [RESECTION]);
    Ok(())
}

#[tokio::test]
async fn module_init_with_defaults_uses_builtin_dataset() -> Result<()> {
    let module = OrJourney::init(&OrJourneyConfig::default())?;
    assert_eq!(module.summary().operations, 3);
    assert_eq!(module.integrity_issues().len(), 1);
    assert!(module.integrity_issues()[0].contains(MENINGIOMA_2));

    // Unreferenced operations are still served by id
    let orphan = module.client().get_operation(MENINGIOMA_2).await?;
    assert_eq!(orphan.events.len(), 12);

    let op = module.client().get_operation(RESECTION).await?;
    assert_eq!(op.events.len(), 14);
    Ok(())
}

#[tokio::test]
async fn module_init_rejects_unknown_event_order() {
    let cfg = OrJourneyConfig {
        default_event_order: "random".to_string(),
        ..Default::default()
    };
    assert!(OrJourney::init(&cfg).is_err());
}

#[tokio::test]
async fn module_init_fails_for_missing_dataset_file() {
    let cfg = OrJourneyConfig {
        dataset_path: Some("/definitely/not/here.json".to_string()),
        ..Default::default()
    };
    let err = OrJourney::init(&cfg).err().expect("init must fail");
    assert!(format!("{err:#}").contains("not/here.json"));
}

#[tokio::test]
async fn rest_get_user() -> Result<()> {
    let (status, _, body) = get(create_test_router(), &format!("/users/{MARY}"), None).await?;
    assert_eq!(status, StatusCode::OK);

    let user: UserDto = serde_json::from_value(body)?;
    assert_eq!(user.name, "Mary Jones");
    assert_eq!(user.cases, vec![RESECTION.to_string()]);
    Ok(())
}

#[tokio::test]
async fn rest_get_operation_uses_dataset_field_names() -> Result<()> {
    let (status, _, body) = get(create_test_router(), &format!("/operations/{RESECTION}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skintoskintime"], 1.75);
    assert_eq!(body["events"][0]["type"], "Pre Operative");
    assert_eq!(body["events"][5]["forceaverage"], 0.42);
    assert_eq!(body["events"][5]["contentWarning"], true);

    let op: OperationDto = serde_json::from_value(body)?;
    assert_eq!(op.events.len(), 14);
    Ok(())
}

#[tokio::test]
async fn rest_not_found_is_problem_json() -> Result<()> {
    let (status, content_type, body) =
        get(create_test_router(), "/operations/does-not-exist", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type, "application/problem+json");
    assert_eq!(body["code"], "OR_JOURNEY_OPERATION_NOT_FOUND");
    assert_eq!(body["instance"], "/operations/does-not-exist");

    let (status, _, body) = get(create_test_router(), "/users/does-not-exist", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "OR_JOURNEY_USER_NOT_FOUND");

    let (status, content_type, body) =
        get(create_test_router(), "/users/does-not-exist/operations", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type, "application/problem+json");
    assert_eq!(body["code"], "OR_JOURNEY_USER_NOT_FOUND");
    assert_eq!(body["instance"], "/users/does-not-exist/operations");
    Ok(())
}

#[tokio::test]
async fn rest_events_respect_order_parameter() -> Result<()> {
    let uri = format!("/operations/{CRANIOTOMY}/events");

    let (status, _, body) = get(create_test_router(), &uri, None).await?;
    assert_eq!(status, StatusCode::OK);
    let stored: EventListDto = serde_json::from_value(body)?;
    assert_eq!(stored.order, "stored");
    assert_eq!(stored.total, 17);
    assert_eq!(stored.events[9].event_id, "96e978ad-e10");

    let (status, _, body) = get(create_test_router(), &format!("{uri}?order=chronological"), None).await?;
    assert_eq!(status, StatusCode::OK);
    let sorted: EventListDto = serde_json::from_value(body)?;
    assert_eq!(sorted.order, "chronological");
    assert_eq!(sorted.events[6].event_id, "96e978ad-e10");
    Ok(())
}

#[tokio::test]
async fn rest_events_reject_unknown_order() -> Result<()> {
    let (status, content_type, body) = get(
        create_test_router(),
        &format!("/operations/{RESECTION}/events?order=sideways"),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type, "application/problem+json");
    assert_eq!(body["code"], "OR_JOURNEY_BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn rest_events_malformed_query_is_problem_json() -> Result<()> {
    let (status, content_type, body) = get(
        create_test_router(),
        &format!("/operations/{RESECTION}/events?order=stored&order=chronological"),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type, "application/problem+json");
    assert_eq!(body["code"], "OR_JOURNEY_BAD_REQUEST");
    assert_eq!(body["instance"], format!("/operations/{RESECTION}/events"));
    Ok(())
}

#[tokio::test]
async fn rest_media_and_phases() -> Result<()> {
    let (status, _, body) = get(create_test_router(), &format!("/operations/{RESECTION}/media"), None).await?;
    assert_eq!(status, StatusCode::OK);
    let media: MediaListDto = serde_json::from_value(body)?;
    assert_eq!(media.total, 7);
    assert_eq!(media.items[0].kind, MediaKindDto::Image);
    assert_eq!(media.items[2].kind, MediaKindDto::Video);

    let (status, _, body) = get(create_test_router(), &format!("/operations/{RESECTION}/phases"), None).await?;
    assert_eq!(status, StatusCode::OK);
    let phases: PhaseListDto = serde_json::from_value(body)?;
    assert_eq!(phases.phases.len(), 3);
    assert_eq!(phases.phases[1].phase, "Intraoperative");
    Ok(())
}

#[tokio::test]
async fn rest_user_operations() -> Result<()> {
    let (status, _, body) = get(create_test_router(), &format!("/users/{ALICE}/operations"), None).await?;
    assert_eq!(status, StatusCode::OK);
    let list: OperationListDto = serde_json::from_value(body)?;
    assert_eq!(list.total, 0);

    let (_, _, body) = get(create_test_router(), &format!("/users/{MARY}/operations"), None).await?;
    let list: OperationListDto = serde_json::from_value(body)?;
    assert_eq!(list.operations[0].id, RESECTION);
    assert_eq!(list.operations[0].event_count, 14);
    Ok(())
}

#[tokio::test]
async fn rest_me_requires_bearer_token() -> Result<()> {
    let (status, content_type, body) = get(create_test_router(), "/me", None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(content_type, "application/problem+json");
    assert_eq!(body["code"], "OR_JOURNEY_UNAUTHORIZED");

    let (status, _, _) = get(create_test_router(), "/me/operations", Some("wrong")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn rest_me_resolves_token_to_patient() -> Result<()> {
    let (status, _, body) = get(create_test_router(), "/me", Some("mary-token")).await?;
    assert_eq!(status, StatusCode::OK);
    let user: UserDto = serde_json::from_value(body)?;
    assert_eq!(user.id, MARY);

    let (status, _, body) = get(create_test_router(), "/me/operations", Some("mary-token")).await?;
    assert_eq!(status, StatusCode::OK);
    let list: OperationListDto = serde_json::from_value(body)?;
    assert_eq!(list.user_id, MARY);
    assert_eq!(list.total, 1);

    // A token bound to a patient missing from the dataset is a 404, not a 401
    let (status, _, _) = get(create_test_router(), "/me", Some("ghost-token")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
