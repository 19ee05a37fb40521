//! Axum router assembly.

use axum::Router;
use axum::extract::Request;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use inventory_app::ports::DeviceRepository;

use crate::state::AppState;

/// Header carrying the request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the top-level axum [`Router`].
///
/// Serves the API routes at the root and again under [`crate::api::PREFIX`],
/// and wraps everything in the request-id and request-log middleware: a
/// request without an `x-request-id` header gets a fresh UUID, the id is
/// recorded on the [`TraceLayer`] span, and it is echoed back on the response.
pub fn build<DR>(state: AppState<DR>) -> Router
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(PropagateRequestIdLayer::x_request_id());

    Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .nest(crate::api::PREFIX, crate::api::routes())
        .layer(middleware)
        .with_state(state)
}

fn request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id,
    )
}

async fn health_check() -> &'static str {
    "OK"
}
