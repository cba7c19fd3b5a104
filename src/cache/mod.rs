//! Resolution cache in front of the link store.
//!
//! Cache-aside: the redirect resolver asks here first and populates on a
//! store hit. Mutations invalidate the entry after the store write lands.
//! The moka implementation carries a default TTL as a safety net against a
//! missed invalidation.

mod moka;
mod null;

use async_trait::async_trait;

pub use self::moka::MokaLinkCache;
pub use null::NullCache;

use crate::storage::ShortLink;

/// 缓存查询结果
#[derive(Debug, Clone)]
pub enum CacheResult {
    /// 成功获取到缓存值
    Found(ShortLink),
    /// 未缓存，需要回源
    Miss,
}

#[async_trait]
pub trait LinkCache: Send + Sync {
    async fn get(&self, code: &str) -> CacheResult;
    async fn insert(&self, code: String, link: ShortLink);
    async fn remove(&self, code: &str);
}
