//! Link management service tests
//!
//! Create validation, tier quotas, ownership checks on delete, preview.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use linklet::cache::NullCache;
use linklet::config::QuotaConfig;
use linklet::errors::{LinkletError, Result};
use linklet::services::link_service::{CreateLinkRequest, LinkService};
use linklet::services::{Owner, SubscriptionTier};
use linklet::storage::{LinkStore, MemoryStore, ShortLink};

/// LinkStore stub whose unique-constraint insert rejects the first
/// `rejections` attempts, simulating allocation races the pre-check missed.
struct RacingInsertStore {
    rejections: u32,
    insert_calls: AtomicU32,
}

impl RacingInsertStore {
    fn new(rejections: u32) -> Self {
        Self {
            rejections,
            insert_calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl LinkStore for RacingInsertStore {
    async fn get(&self, _code: &str) -> Result<Option<ShortLink>> {
        Ok(None)
    }

    async fn exists(&self, _code: &str) -> Result<bool> {
        Ok(false)
    }

    async fn insert(&self, link: ShortLink) -> Result<()> {
        let call = self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if call < self.rejections {
            Err(LinkletError::duplicate_code(format!(
                "short code already exists: {}",
                link.code
            )))
        } else {
            Ok(())
        }
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
        "racing-stub"
    }
}

fn service_with_quotas(quotas: QuotaConfig) -> (Arc<MemoryStore>, LinkService) {
    let store = Arc::new(MemoryStore::new());
    let service = LinkService::new(store.clone(), Arc::new(NullCache), quotas);
    (store, service)
}

fn service() -> (Arc<MemoryStore>, LinkService) {
    service_with_quotas(QuotaConfig::default())
}

fn owner(id: &str, tier: SubscriptionTier) -> Owner {
    Owner {
        id: id.to_string(),
        tier,
    }
}

fn create_request(target: &str) -> CreateLinkRequest {
    CreateLinkRequest {
        target: target.to_string(),
        title: None,
        description: None,
        expires_at: None,
    }
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_persists_link() {
    let (store, service) = service();
    let alice = owner("alice", SubscriptionTier::Free);

    let link = service
        .create(create_request("https://example.com/page"), &alice)
        .await
        .unwrap();

    assert_eq!(link.code.len(), 6);
    assert_eq!(link.owner, "alice");
    assert!(link.active);
    assert_eq!(link.click_count, 0);

    let stored = store.get(&link.code).await.unwrap().unwrap();
    assert_eq!(stored.target, "https://example.com/page");
}

#[tokio::test]
async fn test_create_rejects_invalid_targets() {
    let (_, service) = service();
    let alice = owner("alice", SubscriptionTier::Free);

    for target in [
        "",
        "   ",
        "ftp://example.com",
        "example.com",
        "javascript:alert(1)",
        "data:text/html,<h1>x</h1>",
        "https://",
    ] {
        let err = service
            .create(create_request(target), &alice)
            .await
            .unwrap_err();
        assert!(
            matches!(err, LinkletError::Validation(_)),
            "target {target:?} should fail validation"
        );
    }
}

#[tokio::test]
async fn test_create_rejects_oversized_metadata() {
    let (_, service) = service();
    let alice = owner("alice", SubscriptionTier::Free);

    let mut req = create_request("https://example.com");
    req.title = Some("x".repeat(501));
    assert!(matches!(
        service.create(req, &alice).await.unwrap_err(),
        LinkletError::Validation(_)
    ));

    let mut req = create_request("https://example.com");
    req.description = Some("x".repeat(1001));
    assert!(matches!(
        service.create(req, &alice).await.unwrap_err(),
        LinkletError::Validation(_)
    ));

    // Boundary lengths pass.
    let mut req = create_request("https://example.com");
    req.title = Some("x".repeat(500));
    req.description = Some("x".repeat(1000));
    assert!(service.create(req, &alice).await.is_ok());
}

#[tokio::test]
async fn test_quota_enforced_per_tier() {
    let quotas = QuotaConfig {
        free: Some(2),
        premium: Some(3),
        enterprise: None,
    };
    let (_, service) = service_with_quotas(quotas);
    let alice = owner("alice", SubscriptionTier::Free);

    for _ in 0..2 {
        service
            .create(create_request("https://example.com"), &alice)
            .await
            .unwrap();
    }
    let err = service
        .create(create_request("https://example.com"), &alice)
        .await
        .unwrap_err();
    assert!(matches!(err, LinkletError::Validation(_)));

    // Another owner has their own budget.
    let bob = owner("bob", SubscriptionTier::Free);
    assert!(service
        .create(create_request("https://example.com"), &bob)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_unlimited_tier_has_no_quota() {
    let quotas = QuotaConfig {
        free: Some(1),
        premium: Some(1),
        enterprise: None,
    };
    let (_, service) = service_with_quotas(quotas);
    let carol = owner("carol", SubscriptionTier::Enterprise);

    for _ in 0..5 {
        service
            .create(create_request("https://example.com"), &carol)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_soft_deleted_links_free_quota() {
    let quotas = QuotaConfig {
        free: Some(1),
        premium: Some(1),
        enterprise: None,
    };
    let (_, service) = service_with_quotas(quotas);
    let alice = owner("alice", SubscriptionTier::Free);

    let link = service
        .create(create_request("https://example.com"), &alice)
        .await
        .unwrap();
    service.delete(&link.code, &alice).await.unwrap();

    // Quota counts active links only.
    assert!(service
        .create(create_request("https://example.com"), &alice)
        .await
        .is_ok());
}

/// A duplicate-code rejection from the store is a collision, not an error:
/// create allocates a fresh code and tries again.
#[tokio::test]
async fn test_create_retries_when_insert_loses_allocation_race() {
    let store = Arc::new(RacingInsertStore::new(2));
    let service = LinkService::new(store.clone(), Arc::new(NullCache), QuotaConfig::default());
    let alice = owner("alice", SubscriptionTier::Free);

    let link = service
        .create(create_request("https://example.com"), &alice)
        .await
        .unwrap();

    assert_eq!(link.code.len(), 6);
    assert_eq!(store.insert_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_create_exhausted_when_inserts_always_collide() {
    let store = Arc::new(RacingInsertStore::new(u32::MAX));
    let service = LinkService::new(store.clone(), Arc::new(NullCache), QuotaConfig::default());
    let alice = owner("alice", SubscriptionTier::Free);

    let err = service
        .create(create_request("https://example.com"), &alice)
        .await
        .unwrap_err();

    assert!(matches!(err, LinkletError::AllocationExhausted(_)));
    assert_eq!(store.insert_calls.load(Ordering::SeqCst), 5);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_is_soft() {
    let (store, service) = service();
    let alice = owner("alice", SubscriptionTier::Free);

    let link = service
        .create(create_request("https://example.com"), &alice)
        .await
        .unwrap();
    service.delete(&link.code, &alice).await.unwrap();

    let stored = store.get(&link.code).await.unwrap().unwrap();
    assert!(!stored.active);
}

#[tokio::test]
async fn test_delete_requires_ownership() {
    let (_, service) = service();
    let alice = owner("alice", SubscriptionTier::Free);
    let bob = owner("bob", SubscriptionTier::Free);

    let link = service
        .create(create_request("https://example.com"), &alice)
        .await
        .unwrap();

    let err = service.delete(&link.code, &bob).await.unwrap_err();
    assert!(matches!(err, LinkletError::PermissionDenied(_)));
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let (_, service) = service();
    let alice = owner("alice", SubscriptionTier::Free);

    let err = service.delete("zzz999", &alice).await.unwrap_err();
    assert!(matches!(err, LinkletError::NotFound(_)));
}

// =============================================================================
// Preview
// =============================================================================

#[tokio::test]
async fn test_preview_returns_active_link() {
    let (_, service) = service();
    let alice = owner("alice", SubscriptionTier::Free);

    let link = service
        .create(create_request("https://example.com"), &alice)
        .await
        .unwrap();
    let preview = service.preview(&link.code).await.unwrap();
    assert_eq!(preview.target, "https://example.com");
}

#[tokio::test]
async fn test_preview_hides_soft_deleted() {
    let (_, service) = service();
    let alice = owner("alice", SubscriptionTier::Free);

    let link = service
        .create(create_request("https://example.com"), &alice)
        .await
        .unwrap();
    service.delete(&link.code, &alice).await.unwrap();

    let err = service.preview(&link.code).await.unwrap_err();
    assert!(matches!(err, LinkletError::NotFound(_)));
}
