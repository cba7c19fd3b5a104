use async_trait::async_trait;

use super::{CacheResult, LinkCache};
use crate::storage::ShortLink;

/// No-op cache for disabled-cache configurations; every lookup goes to the
/// store.
pub struct NullCache;

#[async_trait]
impl LinkCache for NullCache {
    async fn get(&self, _code: &str) -> CacheResult {
        CacheResult::Miss
    }

    async fn insert(&self, _code: String, _link: ShortLink) {}

    async fn remove(&self, _code: &str) {}
}
