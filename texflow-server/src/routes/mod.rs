use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::core::ServerState;
use crate::middleware;

fn request_id_header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

/// Mints the id that ties a request's log lines to the client's response
#[derive(Clone)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Every `/api` resource router, without layers or state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(api::health::router())
        // catalog edits and the ledger share the per-product stock locks
        .merge(api::products::router())
        .merge(api::transactions::router())
        .merge(api::suppliers::router())
        .merge(api::customers::router())
        .merge(api::reports::router())
}

/// Router with the full layer stack; the binary and the in-process client
/// tests both drive this
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // inline base64 product images set the ceiling
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        // the storefront and counter UIs are served from other origins
        .layer(CorsLayer::permissive())
        // product listings carry images, so compress responses
        .layer(CompressionLayer::new())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        // echo the request's id on the response
        .layer(PropagateRequestIdLayer::new(request_id_header()))
        // outermost, so every inner layer and the log line see the id
        .layer(SetRequestIdLayer::new(request_id_header(), UuidRequestId))
}
