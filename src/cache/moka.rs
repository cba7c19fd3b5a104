use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use tracing::debug;

use super::{CacheResult, LinkCache};
use crate::storage::ShortLink;

/// Per-entry expiry: never cache past the link's own `expires_at`, and never
/// longer than the configured default TTL.
struct LinkExpiry {
    default_ttl: Duration,
}

impl Expiry<String, ShortLink> for LinkExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &ShortLink,
        _created_at: Instant,
    ) -> Option<Duration> {
        match value.expires_at {
            Some(expires_at) => {
                let now = chrono::Utc::now();
                if expires_at <= now {
                    // 已过期，设置极短 TTL
                    Some(Duration::from_secs(1))
                } else {
                    let remaining = (expires_at - now).num_seconds().max(1) as u64;
                    Some(Duration::from_secs(
                        remaining.min(self.default_ttl.as_secs()),
                    ))
                }
            }
            None => Some(self.default_ttl),
        }
    }
}

pub struct MokaLinkCache {
    inner: Cache<String, ShortLink>,
}

impl MokaLinkCache {
    pub fn new(max_capacity: u64, default_ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(LinkExpiry { default_ttl })
            .build();

        debug!(
            max_capacity,
            default_ttl_secs = default_ttl.as_secs(),
            "moka link cache initialized"
        );
        Self { inner }
    }
}

#[async_trait]
impl LinkCache for MokaLinkCache {
    async fn get(&self, code: &str) -> CacheResult {
        match self.inner.get(code).await {
            Some(link) => CacheResult::Found(link),
            None => CacheResult::Miss,
        }
    }

    async fn insert(&self, code: String, link: ShortLink) {
        self.inner.insert(code, link).await;
    }

    async fn remove(&self, code: &str) {
        self.inner.invalidate(code).await;
    }
}
