use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use service::{auth::AuthError, errors::ServiceError};
use thiserror::Error;
use tracing::{error, warn};

/// Errors returned to clients as `{"success": false, "error": <status>, "message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error("unprocessable")]
    Unprocessable,
    #[error("internal server error")]
    Internal,
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    /// Write-path policy: anything but a missing row becomes 422, cause logged only.
    pub fn unprocessable(e: ServiceError) -> Self {
        if e.is_not_found() {
            return ApiError::NotFound;
        }
        warn!(error = %e, "request unprocessable");
        ApiError::Unprocessable
    }

    pub fn internal(e: ServiceError) -> Self {
        error!(error = %e, "request failed");
        ApiError::Internal
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(e) => StatusCode::from_u16(e.status()).unwrap_or(StatusCode::UNAUTHORIZED),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Auth(e) => json!({
                "success": false,
                "error": status.as_u16(),
                "message": e.to_string(),
                "code": e.code(),
            }),
            other => json!({
                "success": false,
                "error": status.as_u16(),
                "message": other.to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_errors_collapse_to_unprocessable() {
        let dup = ServiceError::Model(models::errors::ModelError::Conflict("title".into()));
        assert!(matches!(ApiError::unprocessable(dup), ApiError::Unprocessable));
        assert!(matches!(ApiError::unprocessable(ServiceError::not_found("drink")), ApiError::NotFound));
        assert!(matches!(ApiError::internal(ServiceError::Model(models::errors::ModelError::Db("down".into()))), ApiError::Internal));
    }

    #[test]
    fn statuses() {
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Unprocessable.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::from(AuthError::PermissionDenied).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::from(AuthError::TokenExpired).status(), StatusCode::UNAUTHORIZED);
    }
}
