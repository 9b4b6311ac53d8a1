use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use service::auth::{AuthError, TokenVerifier};
use tracing::warn;

use crate::errors::ApiError;
use crate::state::AppState;

pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
pub const POST_DRINKS: &str = "post:drinks";
pub const PATCH_DRINKS: &str = "patch:drinks";
pub const DELETE_DRINKS: &str = "delete:drinks";

/// State for one guarded route: which permission it needs.
#[derive(Clone)]
pub struct PermissionGuard {
    verifier: Arc<TokenVerifier>,
    permission: &'static str,
}

impl PermissionGuard {
    pub fn new(state: &AppState, permission: &'static str) -> Self {
        Self { verifier: Arc::clone(&state.verifier), permission }
    }
}

/// 路由级中间件：校验 Authorization: Bearer <token> 并检查所需权限。
/// 成功时把解码后的 Claims 注入 request extensions 供 handler 使用。
pub async fn require_permission(
    State(guard): State<PermissionGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_string();
    let header = match req.headers().get(AUTHORIZATION) {
        None => None,
        Some(v) => match v.to_str() {
            Ok(s) => Some(s.to_string()),
            Err(_) => {
                return Err(AuthError::InvalidHeader("Authorization header must be bearer token.".into()).into());
            }
        },
    };

    let claims = guard
        .verifier
        .authorize(header.as_deref(), guard.permission)
        .await
        .map_err(|e| {
            warn!(path = %path, permission = guard.permission, code = e.code(), "authorization failed");
            e
        })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
