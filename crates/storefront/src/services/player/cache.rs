//! TTL cache over a resolver.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use ucdrop_core::PlayerId;

use super::{PlayerProfile, PlayerResolver, ResolveError};

/// Caching wrapper around any [`PlayerResolver`].
///
/// Only successful lookups are cached; not-found and upstream errors always
/// hit the inner resolver again, so a provider blip never pins a bad answer.
pub struct CachedResolver<R> {
    inner: R,
    cache: Cache<String, PlayerProfile>,
}

impl<R> CachedResolver<R> {
    /// Wrap a resolver with a TTL cache.
    #[must_use]
    pub fn new(inner: R, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(ttl)
                .build(),
        }
    }
}

#[async_trait]
impl<R: PlayerResolver> PlayerResolver for CachedResolver<R> {
    async fn resolve(&self, id: &PlayerId) -> Result<PlayerProfile, ResolveError> {
        if let Some(profile) = self.cache.get(id.as_str()).await {
            return Ok(profile);
        }

        let profile = self.inner.resolve(id).await?;
        self.cache
            .insert(id.as_str().to_string(), profile.clone())
            .await;
        Ok(profile)
    }
}
