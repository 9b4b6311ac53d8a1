pub mod drinks;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use crate::auth::{self, PermissionGuard};
use crate::errors::ApiError;
use crate::openapi::{ApiDoc, HealthResponse};
use crate::state::AppState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = HealthResponse)))]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Apply the permission middleware to every route in `router`.
fn guarded(router: Router<AppState>, state: &AppState, permission: &'static str) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(
        PermissionGuard::new(state, permission),
        auth::require_permission,
    ))
}

/// Build the full application router: public menu, guarded catalog routes, docs.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    // Public routes (health + docs + menu)
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/drinks", get(drinks::list));

    // 每条受保护路由各自挂载所需权限；同一路径的不同方法在 merge 时合并
    let detail = guarded(
        Router::new().route("/drinks-detail", get(drinks::detail)),
        &state,
        auth::GET_DRINKS_DETAIL,
    );
    let create = guarded(Router::new().route("/drinks", post(drinks::create)), &state, auth::POST_DRINKS);
    let update = guarded(Router::new().route("/drinks/:id", patch(drinks::update)), &state, auth::PATCH_DRINKS);
    let remove = guarded(Router::new().route("/drinks/:id", delete(drinks::delete)), &state, auth::DELETE_DRINKS);

    public
        .merge(detail)
        .merge(create)
        .merge(update)
        .merge(remove)
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
