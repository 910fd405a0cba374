use std::sync::Arc;

use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Serve a prebuilt OpenAPI document.
pub async fn serve_openapi(doc: Arc<Value>) -> Response {
    ([(header::CACHE_CONTROL, "no-store")], Json((*doc).clone())).into_response()
}

/// Unknown routes answer with a problem document instead of an empty body.
pub async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "application/problem+json")],
        Json(json!({
            "type": "about:blank",
            "title": "Not Found",
            "status": 404,
            "detail": format!("No route for {}", uri.path()),
            "instance": uri.path(),
        })),
    )
        .into_response()
}
