use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use service::{
    auth::TokenVerifier,
    drink::{DrinkService, SeaOrmDrinkRepository},
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Connect the database, bootstrap the schema and wire the shared state.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let db = models::db::connect(&cfg.database).await?;
    if cfg.database.reset_on_start {
        models::db::reset_schema(&db).await?;
    } else {
        models::db::ensure_schema(&db).await?;
    }
    let drinks = DrinkService::new(Arc::new(SeaOrmDrinkRepository { db }));
    let verifier = TokenVerifier::from_config(&cfg.auth)?;
    info!(domain = %cfg.auth.domain, audience = %cfg.auth.audience, "token verifier configured");
    Ok(AppState::new(drinks, Arc::new(verifier)))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
    }
}

/// Public entry: build the app and run the HTTP server until Ctrl+C
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "starting drinks server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
