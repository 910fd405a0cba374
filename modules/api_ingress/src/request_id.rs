//! `x-request-id` handling and the per-request tracing span.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Request, Response};
use axum::{body::Body, middleware::Next};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::request_id::{MakeRequestId, RequestId};
use tower_http::trace::{DefaultOnRequest, TraceLayer};
use tracing::{field::Empty, Span};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request id as seen by handlers (request extension).
#[derive(Clone, Debug)]
pub struct XRequestId(pub String);

/// Generates a nanoid for requests that arrive without an id.
#[derive(Clone, Copy, Default)]
pub struct NanoRequestId;

impl MakeRequestId for NanoRequestId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&nanoid::nanoid!())
            .ok()
            .map(RequestId::new)
    }
}

fn incoming_id<B>(req: &Request<B>) -> Option<&str> {
    req.headers().get(X_REQUEST_ID)?.to_str().ok()
}

/// Copies the request id into extensions and onto the `http_request` span.
pub async fn record_request_id(mut req: Request<Body>, next: Next) -> axum::response::Response {
    let rid = incoming_id(&req).unwrap_or_default().to_owned();
    Span::current().record("request_id", rid.as_str());
    req.extensions_mut().insert(XRequestId(rid));
    next.run(req).await
}

fn request_span(req: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %req.method(),
        path = %req.uri().path(),
        request_id = incoming_id(req).unwrap_or("n/a"),
        status = Empty,
        latency_ms = Empty
    )
}

fn record_response(res: &Response<Body>, latency: Duration, span: &Span) {
    span.record("status", res.status().as_u16());
    span.record("latency_ms", latency.as_millis() as u64);
    tracing::debug!(parent: span, "request finished");
}

pub type HttpTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    fn(&Request<Body>) -> Span,
    DefaultOnRequest,
    fn(&Response<Body>, Duration, &Span),
>;

/// One `http_request` span per request, with status and latency filled in on response.
pub fn trace_layer() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(request_span as fn(&Request<Body>) -> Span)
        .on_response(record_response as fn(&Response<Body>, Duration, &Span))
}
