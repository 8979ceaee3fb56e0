pub mod auth;
pub mod contacts;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

/// Multipart framing allowance on top of the avatar size limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: contacts, public and private user
/// routes, static avatars, and the OpenAPI document.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Public routes (health, docs, uploaded avatars)
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest_service("/avatars", ServeDir::new(state.avatars.avatars_dir()));

    // Contact CRUD, unauthenticated
    let contacts_routes = Router::new()
        .route("/api/contacts", get(contacts::list).post(contacts::create))
        .route(
            "/api/contacts/:id",
            get(contacts::get)
                .put(contacts::replace)
                .patch(contacts::patch)
                .delete(contacts::remove),
        );

    // Account creation and login
    let users_public = Router::new()
        .route("/api/users/signup", post(users::signup))
        .route("/api/users/login", post(users::login));

    // Protected user routes
    let users_private = Router::new()
        .route("/api/users/logout", get(users::logout))
        .route("/api/users/current", get(users::current))
        .route(
            "/api/users/avatars",
            // multipart body limit sits just above the avatar size limit
            post(users::upload_avatar)
                .layer(DefaultBodyLimit::max(state.avatars.max_bytes() + MULTIPART_OVERHEAD)),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_user));

    // Compose
    public
        .merge(contacts_routes)
        .merge(users_public)
        .merge(users_private)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                // request received
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
