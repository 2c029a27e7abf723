use axum::extract::{MatchedPath, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram,
    IntCounter, IntCounterVec, TextEncoder,
};

lazy_static! {
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();
    pub static ref STOCK_RECEIPTS_TOTAL: IntCounter = register_int_counter!(
        "stock_receipts_total",
        "Total number of incoming stock receipts recorded"
    )
    .unwrap();
    pub static ref STOCK_ISSUES_TOTAL: IntCounter = register_int_counter!(
        "stock_issues_total",
        "Total number of outgoing stock issues recorded"
    )
    .unwrap();
    pub static ref GATE_PASSES_ISSUED_TOTAL: IntCounter = register_int_counter!(
        "gate_passes_issued_total",
        "Total number of gate passes issued"
    )
    .unwrap();
    pub static ref GATE_PASS_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "gate_pass_failures_total",
        "Gate pass issuance attempts that failed, by stage",
        &["stage"]
    )
    .unwrap();
    pub static ref GATE_PASS_ISSUE_DURATION: Histogram = register_histogram!(
        "gate_pass_issue_duration_seconds",
        "Time spent issuing a gate pass, including the transaction"
    )
    .unwrap();
}

/// Request-counting middleware. Uses the matched route template as the path
/// label to keep cardinality bounded.
pub async fn track_http_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let response = next.run(request).await;

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method.as_str(), path.as_str(), response.status().as_str()])
        .inc();

    response
}

/// Prometheus exposition endpoint.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {}", e),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [("content-type", encoder.format_type().to_string())],
        buffer,
    )
        .into_response()
}
