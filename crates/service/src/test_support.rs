//! Fixtures shared by unit tests and the server's HTTP tests: an in-memory
//! SQLite catalog and an RS256 key pair whose public half is served as a
//! static JWKS.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use configs::{AuthConfig, DatabaseConfig};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};

use crate::auth::jwks::{KeySetProvider, StaticKeySet};
use crate::auth::TokenVerifier;
use crate::drink::{DrinkService, SeaOrmDrinkRepository};

pub const TEST_KID: &str = "drinks-test-key";
pub const TEST_DOMAIN: &str = "drinks-test.eu.auth0.com";
pub const TEST_AUDIENCE: &str = "drinks";

const PRIVATE_KEY_PEM: &str = include_str!("../../../fixtures/jwt_rs256.pem");
const JWKS_JSON: &str = include_str!("../../../fixtures/jwks.json");

pub async fn memory_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = models::db::connect(&DatabaseConfig::sqlite_memory()).await?;
    models::db::ensure_schema(&db).await?;
    Ok(db)
}

pub async fn drink_service() -> Result<DrinkService, anyhow::Error> {
    let db = memory_db().await?;
    Ok(DrinkService::new(Arc::new(SeaOrmDrinkRepository { db })))
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        domain: TEST_DOMAIN.into(),
        audience: TEST_AUDIENCE.into(),
        ..AuthConfig::default()
    }
}

pub fn key_set() -> Arc<dyn KeySetProvider> {
    Arc::new(StaticKeySet::from_json(JWKS_JSON).expect("jwks fixture"))
}

pub fn verifier() -> TokenVerifier {
    TokenVerifier::new(key_set(), &auth_config()).expect("test verifier")
}

pub fn now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("clock").as_secs()
}

/// Claims accepted by `verifier()`, valid for an hour.
pub fn claims(permissions: &[&str]) -> Value {
    let now = now();
    json!({
        "iss": format!("https://{TEST_DOMAIN}/"),
        "sub": "auth0|barista",
        "aud": TEST_AUDIENCE,
        "iat": now,
        "exp": now + 3600,
        "permissions": permissions,
    })
}

pub fn sign_with_kid(claims: &Value, kid: Option<&str>) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM.as_bytes()).expect("rsa fixture");
    encode(&header, claims, &key).expect("sign token")
}

pub fn sign(claims: &Value) -> String {
    sign_with_kid(claims, Some(TEST_KID))
}

pub fn token_with_permissions(permissions: &[&str]) -> String {
    sign(&claims(permissions))
}
