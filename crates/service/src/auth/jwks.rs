use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use moka::future::Cache;
use tracing::{debug, info, warn};

use super::errors::AuthError;

/// Source of the identity provider's signing keys.
#[async_trait]
pub trait KeySetProvider: Send + Sync {
    async fn key_set(&self) -> Result<Arc<JwkSet>, AuthError>;

    /// Called when a token names a `kid` missing from `key_set()`.
    /// Sources that can change return a freshly fetched set.
    async fn refresh(&self) -> Result<Arc<JwkSet>, AuthError> {
        self.key_set().await
    }
}

/// Fixed key set, used in tests and for air-gapped deployments.
pub struct StaticKeySet {
    keys: Arc<JwkSet>,
}

impl StaticKeySet {
    pub fn new(keys: JwkSet) -> Self { Self { keys: Arc::new(keys) } }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

#[async_trait]
impl KeySetProvider for StaticKeySet {
    async fn key_set(&self) -> Result<Arc<JwkSet>, AuthError> {
        Ok(Arc::clone(&self.keys))
    }
}

/// Shortest gap between two refreshes forced by unknown `kid`s.
pub const DEFAULT_MIN_REFRESH: Duration = Duration::from_secs(30);

/// JWKS fetched over HTTPS and cached for `ttl`.
/// An unknown `kid` forces a refetch, at most once per `min_refresh`.
pub struct RemoteKeySet {
    client: reqwest::Client,
    url: String,
    cache: Cache<String, Arc<JwkSet>>,
    // 记录最近一次强制刷新，过期前不再重复拉取
    refreshed: Cache<String, ()>,
}

impl RemoteKeySet {
    pub fn new(url: impl Into<String>, ttl: Duration) -> anyhow::Result<Self> {
        Self::with_min_refresh(url, ttl, DEFAULT_MIN_REFRESH)
    }

    pub fn with_min_refresh(url: impl Into<String>, ttl: Duration, min_refresh: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(Duration::from_secs(10)).build()?;
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        let refreshed = Cache::builder().max_capacity(1).time_to_live(min_refresh).build();
        Ok(Self { client, url: url.into(), cache, refreshed })
    }

    async fn fetch(&self) -> Result<Arc<JwkSet>, reqwest::Error> {
        debug!(url = %self.url, "fetching jwks");
        let keys = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;
        debug!(url = %self.url, keys = keys.keys.len(), "jwks fetched");
        Ok(Arc::new(keys))
    }
}

#[async_trait]
impl KeySetProvider for RemoteKeySet {
    async fn key_set(&self) -> Result<Arc<JwkSet>, AuthError> {
        self.cache
            .try_get_with(self.url.clone(), self.fetch())
            .await
            .map_err(|e| {
                warn!(url = %self.url, error = %e, "jwks fetch failed");
                AuthError::KeySetUnavailable
            })
    }

    async fn refresh(&self) -> Result<Arc<JwkSet>, AuthError> {
        if self.refreshed.contains_key(&self.url) {
            debug!(url = %self.url, "jwks refresh throttled");
            return self.key_set().await;
        }
        self.refreshed.insert(self.url.clone(), ()).await;
        self.cache.invalidate(&self.url).await;
        info!(url = %self.url, "unknown kid, refetching jwks");
        self.key_set().await
    }
}
