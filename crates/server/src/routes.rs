use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod accounts;
pub mod auth;
pub mod screens;
pub mod services;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public routes, caller-aware API routes and docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Login and registration ignore stale tokens, so they sit outside the caller middleware.
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout));

    let api = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/api/services", get(services::list).post(services::create))
        .route(
            "/api/services/:id",
            get(services::get).put(services::replace).patch(services::patch).delete(services::delete),
        )
        .route("/api/accounts", get(accounts::list).post(accounts::create))
        .route("/api/accounts/:id", get(accounts::get).patch(accounts::update).delete(accounts::delete))
        .route("/api/screens", get(screens::list).post(screens::create))
        .route("/api/screens/my_screens", get(screens::my_screens))
        .route("/api/screens/claim_next", post(screens::claim_next))
        .route("/api/screens/:id", get(screens::get).patch(screens::update).delete(screens::delete))
        .route("/api/screens/:id/claim", post(screens::claim))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::resolve_caller));

    public
        .merge(api)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx and transport failures
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
