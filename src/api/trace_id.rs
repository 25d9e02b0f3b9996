//! Middleware tagging every request with a trace ID and a span ID.
//!
//! The IDs are taken from the `X-Trace-Id` and `X-Span-Id` request headers,
//! or generated when missing. All logs emitted while handling the request
//! carry them, and the trace ID is echoed back on the response.

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const TRACE_ID_HEADER: &str = "x-trace-id";
pub const SPAN_ID_HEADER: &str = "x-span-id";

pub async fn trace_id_middleware(request: Request, next: Next) -> Response {
    let trace_id = header_or_new_id(&request, TRACE_ID_HEADER);
    let span_id = header_or_new_id(&request, SPAN_ID_HEADER);

    let span = tracing::info_span!("request", %trace_id, %span_id);
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }
    response
}

fn header_or_new_id(request: &Request, name: &str) -> String {
    request
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string())
}
