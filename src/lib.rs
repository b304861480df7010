use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod aggregate;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod repository;
pub mod sync;

// Module for routing segregation (Public, Admin).
pub mod routes;
use routes::{admin, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the application entry point.
pub use config::AppConfig;
pub use policy::{PolicyState, PolicyStore};
pub use repository::{PostgresRepository, RepositoryState};
pub use sync::{PolicySynchronizer, SynchronizerState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation for the admin API. Aggregates
/// every handler decorated with `#[utoipa::path]` and the schemas used in
/// request/response bodies. Served as JSON at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_users, handlers::get_user, handlers::create_user,
        handlers::update_user, handlers::delete_user,
        handlers::list_roles, handlers::select_roles, handlers::get_role,
        handlers::create_role, handlers::update_role, handlers::delete_role,
        handlers::list_menus, handlers::get_menu, handlers::create_menu,
        handlers::update_menu, handlers::delete_menu,
        handlers::list_articles, handlers::get_article, handlers::create_article,
        handlers::update_article, handlers::delete_article,
        handlers::get_config, handlers::update_config,
    ),
    components(
        schemas(
            models::User, models::UserInfo, models::CreateUserRequest,
            models::UpdateUserRequest, models::Role, models::RoleInfo,
            models::CreateRoleRequest, models::UpdateRoleRequest,
            models::Menu, models::MenuInfo, models::CreateMenuRequest,
            models::UpdateMenuRequest, models::Article, models::ArticleInfo,
            models::CreateArticleRequest, models::UpdateArticleRequest,
            models::ConfigEntry, models::UpdateConfigRequest,
            handlers::CreatedResponse, handlers::ConfigResponse,
        )
    ),
    tags(
        (name = "cladmin", description = "Administrative back office API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single shared container for the application's services: the
/// persistence gateway, the in-memory policy store, the synchronizer that
/// keeps the two consistent, and the loaded configuration. Constructed once
/// in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway, behind the `Repository` trait.
    pub repo: RepositoryState,
    /// In-memory authorization rules; the synchronizer is the only writer.
    pub policy: PolicyState,
    /// Policy synchronizer, invoked by mutating handlers.
    pub sync: SynchronizerState,
    /// Loaded, immutable configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These let handlers pull individual components out of the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for PolicyState {
    fn from_ref(app_state: &AppState) -> PolicyState {
        app_state.policy.clone()
    }
}

impl FromRef<AppState> for SynchronizerState {
    fn from_ref(app_state: &AppState) -> SynchronizerState {
        app_state.sync.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, applies the observability layers, and
/// registers the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Anonymous endpoints (health).
        .merge(public::public_routes())
        // Administrative CRUD surface, nested under /sys.
        .nest("/sys", admin::admin_routes())
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                // Generate a unique id for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // Wrap the request/response lifecycle in a tracing span that
                // carries the request id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Return the generated x-request-id header to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes span creation for `TraceLayer`: includes the `x-request-id`
/// header so every log line of one request correlates.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
