use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::AuthError;

/// Verified token payload handed to handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    /// String or array depending on the issuer.
    #[serde(default)]
    pub aud: Option<Value>,
    #[serde(default)]
    pub exp: Option<u64>,
    #[serde(default)]
    pub iat: Option<u64>,
    /// Scopes granted to the caller, e.g. `post:drinks`.
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn require_permission(&self, permission: &str) -> Result<(), AuthError> {
        let granted = self.permissions.as_ref().ok_or(AuthError::PermissionsMissing)?;
        if !granted.iter().any(|p| p == permission) {
            return Err(AuthError::PermissionDenied);
        }
        Ok(())
    }

    pub fn subject(&self) -> &str {
        self.sub.as_deref().unwrap_or("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(value: Value) -> Claims {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn permission_checks() {
        let c = claims(serde_json::json!({"sub": "barista", "permissions": ["get:drinks-detail"]}));
        assert!(c.require_permission("get:drinks-detail").is_ok());
        assert_eq!(c.require_permission("post:drinks"), Err(AuthError::PermissionDenied));

        let none = claims(serde_json::json!({"sub": "barista"}));
        assert_eq!(none.require_permission("get:drinks-detail"), Err(AuthError::PermissionsMissing));

        let empty = claims(serde_json::json!({"permissions": []}));
        assert_eq!(empty.require_permission("get:drinks-detail"), Err(AuthError::PermissionDenied));
    }

    #[test]
    fn keeps_unknown_claims() {
        let c = claims(serde_json::json!({"azp": "frontend", "scope": "openid"}));
        assert_eq!(c.extra.get("azp"), Some(&Value::from("frontend")));
        assert_eq!(c.subject(), "-");
    }

    #[test]
    fn codes_and_statuses() {
        assert_eq!(AuthError::MissingHeader.status(), 401);
        assert_eq!(AuthError::PermissionDenied.code(), "invalid_permissions");
        assert_eq!(AuthError::PermissionDenied.status(), 403);
        assert_eq!(AuthError::PermissionsMissing.code(), "invalid_claims");
        assert_eq!(AuthError::PermissionsMissing.status(), 403);
        assert_eq!(AuthError::TokenExpired.to_string(), "Token expired.");
    }
}
