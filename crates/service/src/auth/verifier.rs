use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use configs::AuthConfig;
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use tracing::{debug, instrument};

use super::claims::Claims;
use super::errors::AuthError;
use super::jwks::{KeySetProvider, RemoteKeySet};

/// Extract the token from an `Authorization` header value.
///
/// Exactly two whitespace-separated parts are accepted, the first being
/// `Bearer` in any case.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.ok_or(AuthError::MissingHeader)?;
    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [] => Err(AuthError::MissingHeader),
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => {
            Err(AuthError::invalid_header("Authorization header must start with \"Bearer\"."))
        }
        [_] => Err(AuthError::invalid_header("Token not found.")),
        [_, token] => Ok(*token),
        _ => Err(AuthError::invalid_header("Authorization header must be bearer token.")),
    }
}

/// Verifies RS-family tokens issued by the configured identity provider.
pub struct TokenVerifier {
    keys: Arc<dyn KeySetProvider>,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(keys: Arc<dyn KeySetProvider>, cfg: &AuthConfig) -> anyhow::Result<Self> {
        let algorithms = cfg
            .algorithms
            .iter()
            .map(|a| a.parse::<Algorithm>().map_err(|e| anyhow!("unsupported algorithm {a}: {e}")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let first = *algorithms.first().ok_or_else(|| anyhow!("at least one algorithm is required"))?;
        if algorithms.iter().any(|a| matches!(a, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) {
            return Err(anyhow!("shared-secret algorithms cannot be verified against a JWKS"));
        }

        let mut validation = Validation::new(first);
        validation.algorithms = algorithms;
        validation.set_audience(&[cfg.audience.as_str()]);
        validation.set_issuer(&[cfg.issuer()]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);
        Ok(Self { keys, validation })
    }

    /// Verifier backed by `https://<domain>/.well-known/jwks.json`.
    pub fn from_config(cfg: &AuthConfig) -> anyhow::Result<Self> {
        let keys = RemoteKeySet::new(cfg.jwks_url(), Duration::from_secs(cfg.jwks_cache_secs))?;
        Self::new(Arc::new(keys), cfg)
    }

    /// Check signature, algorithm, expiry, audience and issuer.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)
            .map_err(|_| AuthError::invalid_header("Unable to parse authentication token."))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::invalid_header("Authorization malformed."))?;

        let mut keys = self.keys.key_set().await?;
        if keys.find(&kid).is_none() {
            // 签名密钥可能已轮换，强制刷新一次
            keys = self.keys.refresh().await?;
        }
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| AuthError::invalid_header("Unable to find the appropriate key."))?;
        let key = DecodingKey::from_jwk(jwk)
            .map_err(|_| AuthError::invalid_header("Unable to find the appropriate key."))?;

        let data = decode::<Claims>(token, &key, &self.validation).map_err(|e| {
            debug!(kid = %kid, error = %e, "token rejected");
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer | ErrorKind::MissingRequiredClaim(_) => {
                    AuthError::InvalidClaims
                }
                _ => AuthError::invalid_header("Unable to parse authentication token."),
            }
        })?;
        Ok(data.claims)
    }

    /// Parse the header, verify the token and require `permission`.
    #[instrument(skip(self, header))]
    pub async fn authorize(&self, header: Option<&str>, permission: &str) -> Result<Claims, AuthError> {
        let token = parse_bearer(header)?;
        let claims = self.verify(token).await?;
        claims.require_permission(permission)?;
        debug!(sub = %claims.subject(), "permission granted");
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, sign, token_with_permissions, TEST_AUDIENCE, TEST_KID};
    use serde_json::json;

    #[test]
    fn bearer_header_shapes() {
        assert_eq!(parse_bearer(None), Err(AuthError::MissingHeader));
        assert_eq!(parse_bearer(Some("Bearer abc")), Ok("abc"));
        assert_eq!(parse_bearer(Some("bearer abc")), Ok("abc"));

        let err = parse_bearer(Some("Basic abc")).unwrap_err();
        assert_eq!(err.code(), "invalid_header");
        assert_eq!(err.to_string(), "Authorization header must start with \"Bearer\".");

        assert_eq!(parse_bearer(Some("Bearer")).unwrap_err().to_string(), "Token not found.");
        assert_eq!(
            parse_bearer(Some("Bearer a b")).unwrap_err().to_string(),
            "Authorization header must be bearer token."
        );
    }

    #[test]
    fn rejects_symmetric_algorithms() {
        let mut cfg = test_support::auth_config();
        cfg.algorithms = vec!["HS256".into()];
        assert!(TokenVerifier::new(test_support::key_set(), &cfg).is_err());

        cfg.algorithms = vec!["XX999".into()];
        assert!(TokenVerifier::new(test_support::key_set(), &cfg).is_err());
    }

    #[tokio::test]
    async fn accepts_valid_token() -> anyhow::Result<()> {
        let verifier = test_support::verifier();
        let token = token_with_permissions(&["get:drinks-detail"]);
        let claims = verifier.authorize(Some(&format!("Bearer {token}")), "get:drinks-detail").await?;
        assert_eq!(claims.subject(), "auth0|barista");
        assert_eq!(claims.permissions, Some(vec!["get:drinks-detail".to_string()]));
        Ok(())
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let mut claims = test_support::claims(&["get:drinks-detail"]);
        claims["exp"] = json!(test_support::now() - 3600);
        let err = test_support::verifier().verify(&sign(&claims)).await.unwrap_err();
        assert_eq!(err, AuthError::TokenExpired);
        assert_eq!(err.code(), "token_expired");
    }

    #[tokio::test]
    async fn rejects_wrong_audience_and_issuer() {
        let verifier = test_support::verifier();

        let mut claims = test_support::claims(&[]);
        claims["aud"] = json!("someone-else");
        assert_eq!(verifier.verify(&sign(&claims)).await.unwrap_err(), AuthError::InvalidClaims);

        let mut claims = test_support::claims(&[]);
        claims["iss"] = json!("https://evil.example.com/");
        assert_eq!(verifier.verify(&sign(&claims)).await.unwrap_err(), AuthError::InvalidClaims);

        let mut claims = test_support::claims(&[]);
        claims.as_object_mut().unwrap().remove("aud");
        assert_eq!(verifier.verify(&sign(&claims)).await.unwrap_err(), AuthError::InvalidClaims);
    }

    #[tokio::test]
    async fn rejects_unknown_kid_and_garbage() {
        let verifier = test_support::verifier();

        let token = test_support::sign_with_kid(&test_support::claims(&[]), Some("rotated-away"));
        let err = verifier.verify(&token).await.unwrap_err();
        assert_eq!(err.to_string(), "Unable to find the appropriate key.");

        let token = test_support::sign_with_kid(&test_support::claims(&[]), None);
        assert_eq!(verifier.verify(&token).await.unwrap_err().code(), "invalid_header");

        let err = verifier.verify("not-a-jwt").await.unwrap_err();
        assert_eq!(err.to_string(), "Unable to parse authentication token.");
    }

    #[tokio::test]
    async fn rejects_tampered_signature() {
        let token = token_with_permissions(&["post:drinks"]);
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        // payload swapped for one granting more scopes
        let forged = sign(&test_support::claims(&["post:drinks", "delete:drinks"]));
        parts[1] = forged.split('.').nth(1).unwrap().to_string();
        let err = test_support::verifier().verify(&parts.join(".")).await.unwrap_err();
        assert_eq!(err.code(), "invalid_header");
    }

    #[tokio::test]
    async fn missing_or_insufficient_permissions_are_forbidden() {
        let verifier = test_support::verifier();

        let mut claims = test_support::claims(&[]);
        claims.as_object_mut().unwrap().remove("permissions");
        let header = format!("Bearer {}", sign(&claims));
        let err = verifier.authorize(Some(&header), "post:drinks").await.unwrap_err();
        assert_eq!((err.status(), err.code()), (403, "invalid_claims"));

        let header = format!("Bearer {}", token_with_permissions(&["get:drinks-detail"]));
        let err = verifier.authorize(Some(&header), "post:drinks").await.unwrap_err();
        assert_eq!((err.status(), err.code()), (403, "invalid_permissions"));
    }

    #[test]
    fn fixture_constants_line_up() {
        assert_eq!(test_support::auth_config().audience, TEST_AUDIENCE);
        assert_eq!(TEST_KID, "drinks-test-key");
    }
}
