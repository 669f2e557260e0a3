//! HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers. Route composition lives here so
//! `main` stays small and tests can build the exact production router.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::auth::AuthVerifier;
use crate::service::RecipeService;
use crate::store::RecipeStore;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RecipeService>,
    pub store: Arc<dyn RecipeStore>,
    pub verifier: Arc<AuthVerifier>,
    pub api_version: String,
    pub cache_backend: &'static str,
    pub media_dir: PathBuf,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(
        |request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        },
    );

    let media_dir = state.media_dir.clone();

    Router::new()
        .route(
            "/v1/system/info",
            axum::routing::get(api::system::system_info),
        )
        .route(
            "/v1/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route("/api/users", axum::routing::post(api::users::signup))
        .route("/api/auth/login", axum::routing::post(api::auth::login))
        .route("/api/auth/logout", axum::routing::post(api::auth::logout))
        .route(
            "/api/recipes",
            axum::routing::get(api::recipes::list_recipes).post(api::recipes::create_recipe),
        )
        .route(
            "/api/recipes/upload-image",
            axum::routing::post(api::recipes::upload_image),
        )
        .route(
            "/api/recipes/rating/:recipe_id",
            axum::routing::put(api::recipes::add_rating),
        )
        .route(
            "/api/recipes/comment/:recipe_id",
            axum::routing::put(api::recipes::add_comment),
        )
        .route(
            "/api/recipes/user-feedback/:recipe_id",
            axum::routing::get(api::recipes::user_feedback),
        )
        .route(
            "/api/recipes/:recipe_id",
            axum::routing::get(api::recipes::get_recipe)
                .put(api::recipes::update_recipe)
                .delete(api::recipes::delete_recipe),
        )
        .nest_service("/media", ServeDir::new(media_dir))
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/v1/openapi.json", ApiDoc::openapi()),
        )
        .layer(trace_layer)
        .with_state(state)
}
