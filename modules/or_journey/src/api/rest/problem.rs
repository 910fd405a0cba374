use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Error body returned by every or_journey endpoint (RFC 9457).
///
/// `code` is the stable catalog code clients should branch on; `type` is its
/// documentation URL. `instance` is the request path that failed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "Problem")]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub instance: String,
    pub code: String,
    /// Id of the tracing span that handled the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".into(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            trace_id: None,
        }
    }

    /// Tag with a catalog code and its documentation URL.
    pub fn coded(self, code: &str, type_url: &str) -> Self {
        Self {
            code: code.to_owned(),
            type_url: type_url.to_owned(),
            ..self
        }
    }

    pub fn at(self, instance: &str) -> Self {
        Self {
            instance: instance.to_owned(),
            ..self
        }
    }

    /// Attach the id of the current span, if any.
    pub fn traced(self) -> Self {
        let trace_id = tracing::Span::current()
            .id()
            .map(|id| id.into_u64().to_string());
        Self { trace_id, ..self }
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// `Problem` as an axum response.
#[derive(Debug, Clone)]
pub struct ProblemResponse(pub Problem);

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self(p)
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        (
            self.0.status_code(),
            [(header::CONTENT_TYPE, APPLICATION_PROBLEM_JSON)],
            Json(self.0),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_status_and_problem_content_type() {
        let p = Problem::new(StatusCode::NOT_FOUND, "Not Found", "no such operation");
        let resp = ProblemResponse(p).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            APPLICATION_PROBLEM_JSON
        );
    }

    #[test]
    fn out_of_range_status_falls_back_to_500() {
        let mut p = Problem::new(StatusCode::OK, "odd", "odd");
        p.status = 42;
        let resp = ProblemResponse(p).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn untraced_problem_has_no_trace_id() {
        let p = Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized", "missing token")
            .coded("OR_JOURNEY_UNAUTHORIZED", "about:blank")
            .at("/me")
            .traced();
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["type"], "about:blank");
        assert_eq!(v["code"], "OR_JOURNEY_UNAUTHORIZED");
        assert_eq!(v["instance"], "/me");
        assert!(v.get("trace_id").is_none());
    }
}
