//! Storage contracts and the in-memory reference backend.
//!
//! Durable storage is an external collaborator; this module defines the
//! narrow contracts the rest of the crate consumes. [`MemoryStore`] is the
//! bundled backend implementing both, suitable for single-process
//! deployments and tests.

pub mod memory;
pub mod models;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use memory::MemoryStore;
pub use models::{ClickEvent, DeviceType, ShortLink};

use crate::errors::Result;

/// Durable record of code → link metadata.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Point lookup by code. Soft-deleted links are returned too; callers
    /// decide what `active == false` means for them.
    async fn get(&self, code: &str) -> Result<Option<ShortLink>>;

    /// Existence check covering every code ever stored, soft-deleted
    /// included.
    async fn exists(&self, code: &str) -> Result<bool>;

    /// Insert a new link. Must reject an already-present code atomically
    /// with [`LinkletError::DuplicateCode`] — unique-constraint semantics,
    /// safe under concurrent inserts of the same candidate.
    ///
    /// [`LinkletError::DuplicateCode`]: crate::errors::LinkletError::DuplicateCode
    async fn insert(&self, link: ShortLink) -> Result<()>;

    /// Soft delete: flip `active` to false, keep the row.
    async fn deactivate(&self, code: &str) -> Result<()>;

    /// Apply a batch of click-count deltas atomically per code. Deltas for
    /// codes that no longer exist are dropped.
    async fn increment_clicks(&self, deltas: &[(String, u64)]) -> Result<()>;

    async fn count_active_by_owner(&self, owner: &str) -> Result<u64>;

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<ShortLink>>;

    fn backend_name(&self) -> &'static str;
}

/// Append-only store of click events.
#[async_trait]
pub trait ClickStore: Send + Sync {
    async fn append(&self, event: ClickEvent) -> Result<()>;

    async fn count_for_code(&self, code: &str) -> Result<u64>;

    async fn count_since(&self, code: &str, since: DateTime<Utc>) -> Result<u64>;

    async fn events_for_code(&self, code: &str) -> Result<Vec<ClickEvent>>;
}
