pub mod accounts;

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use configs::DEFAULT_BASE_PATH;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// OpenAPI document with account paths moved under `base_path`.
pub fn api_doc(base_path: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let paths = std::mem::take(&mut doc.paths.paths);
    doc.paths.paths = paths
        .into_iter()
        .map(|(path, item)| match path.strip_prefix(DEFAULT_BASE_PATH) {
            Some(rest) => (format!("{base_path}{rest}"), item),
            None => (path, item),
        })
        .collect();
    doc
}

/// Build the application router; account routes are mounted under `base_path`.
pub fn build_router(state: ServerState, base_path: &str, cors: CorsLayer) -> Router {
    let item_path = format!("{base_path}/:id");
    let doc = Arc::new(api_doc(base_path));

    let public = Router::new()
        .route("/health", get(health))
        .route(
            "/api-docs/openapi.json",
            get(move || {
                let body = doc.as_ref().clone();
                async move { Json(body) }
            }),
        );

    let account_routes = Router::new()
        .route(base_path, get(accounts::list).post(accounts::create))
        .route(
            &item_path,
            get(accounts::get).put(accounts::update).delete(accounts::delete),
        );

    public
        .merge(account_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and uri
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
