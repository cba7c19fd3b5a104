//! Code allocation tests
//!
//! The happy path runs against MemoryStore; collision behavior runs against
//! a stub store whose `exists` answers are scripted.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use linklet::errors::{LinkletError, Result};
use linklet::services::allocator::{CodeAllocator, CODE_ALPHABET, CODE_LENGTH};
use linklet::storage::{LinkStore, MemoryStore, ShortLink};

/// LinkStore stub that reports the first `collisions` candidates as taken.
struct CollidingStore {
    collisions: u32,
    calls: AtomicU32,
}

impl CollidingStore {
    fn new(collisions: u32) -> Self {
        Self {
            collisions,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl LinkStore for CollidingStore {
    async fn get(&self, _code: &str) -> Result<Option<ShortLink>> {
        Ok(None)
    }

    async fn exists(&self, _code: &str) -> Result<bool> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(call < self.collisions)
    }

    async fn insert(&self, _link: ShortLink) -> Result<()> {
        Ok(())
    }

    async fn deactivate(&self, _code: &str) -> Result<()> {
        Ok(())
    }

    async fn increment_clicks(&self, _deltas: &[(String, u64)]) -> Result<()> {
        Ok(())
    }

    async fn count_active_by_owner(&self, _owner: &str) -> Result<u64> {
        Ok(0)
    }

    async fn list_by_owner(&self, _owner: &str) -> Result<Vec<ShortLink>> {
        Ok(Vec::new())
    }

    fn backend_name(&self) -> &'static str {
        "colliding-stub"
    }
}

fn make_link(code: &str) -> ShortLink {
    let now = Utc::now();
    ShortLink {
        code: code.to_string(),
        target: "https://example.com".to_string(),
        title: None,
        description: None,
        owner: "alice".to_string(),
        active: true,
        click_count: 0,
        expires_at: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_allocate_against_empty_store() {
    let allocator = CodeAllocator::new(Arc::new(MemoryStore::new()));
    let code = allocator.allocate().await.unwrap();
    assert_eq!(code.len(), CODE_LENGTH);
    assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
}

#[tokio::test]
async fn test_allocated_codes_are_distinct() {
    let store = Arc::new(MemoryStore::new());
    let allocator = CodeAllocator::new(store.clone());

    let mut seen = std::collections::HashSet::new();
    for _ in 0..50 {
        let code = allocator.allocate().await.unwrap();
        store.insert(make_link(&code)).await.unwrap();
        assert!(seen.insert(code), "allocator handed out a taken code");
    }
}

#[tokio::test]
async fn test_allocate_retries_past_collisions() {
    // First four candidates taken, fifth free: succeeds on the last attempt.
    let store = Arc::new(CollidingStore::new(4));
    let allocator = CodeAllocator::new(store.clone());

    let code = allocator.allocate().await.unwrap();
    assert_eq!(code.len(), CODE_LENGTH);
    assert_eq!(store.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_allocate_exhausted_after_five_attempts() {
    let store = Arc::new(CollidingStore::new(u32::MAX));
    let allocator = CodeAllocator::new(store.clone());

    let err = allocator.allocate().await.unwrap_err();
    assert!(matches!(err, LinkletError::AllocationExhausted(_)));
    assert_eq!(store.calls.load(Ordering::SeqCst), 5);
}

/// Existence checks see soft-deleted rows, so their codes are never reissued.
#[tokio::test]
async fn test_soft_deleted_code_not_reissued() {
    let store = Arc::new(MemoryStore::new());
    store.insert(make_link("abc123")).await.unwrap();
    store.deactivate("abc123").await.unwrap();

    assert!(store.exists("abc123").await.unwrap());
}
