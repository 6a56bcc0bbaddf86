use std::str::FromStr;

use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::errors::ApiError;
use crate::middleware::require_bearer_token;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod auth;
pub mod orders;
pub mod users;

/// Body of delete responses.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self { Self { message: message.into() } }
}

pub(crate) fn parse_id<T: FromStr>(raw: &str) -> Result<T, ApiError> {
    raw.parse().map_err(|_| ApiError::bad_request("invalid id"))
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": "route not found"})))
}

fn api_routes(state: ServerState) -> Router<ServerState> {
    let protected = Router::new()
        .route("/users/me", get(users::me))
        .route_layer(middleware::from_fn_with_state(state, require_bearer_token));

    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/signin", post(auth::signin))
        .route("/users", get(users::find_all))
        .route("/users/:id", get(users::find_by_id).patch(users::patch).delete(users::delete))
        .route("/orders", get(orders::find_all).post(orders::create))
        .route("/orders/:id", get(orders::find_by_id).patch(orders::patch).delete(orders::delete))
        .merge(protected)
}

/// Build the REST router: versioned API, health, OpenAPI document and fallback.
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/v1", api_routes(state.clone()))
        .fallback(fallback)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
