//! In-memory storage backend tests
//!
//! Exercises both store contracts through the bundled MemoryStore.

use chrono::{Duration, Utc};
use linklet::errors::LinkletError;
use linklet::storage::{ClickEvent, ClickStore, DeviceType, LinkStore, MemoryStore, ShortLink};

/// 创建测试用的 ShortLink
fn create_test_link(code: &str, owner: &str) -> ShortLink {
    let now = Utc::now();
    ShortLink {
        code: code.to_string(),
        target: format!("https://{code}.example.com"),
        title: None,
        description: None,
        owner: owner.to_string(),
        active: true,
        click_count: 0,
        expires_at: None,
        created_at: now,
        updated_at: now,
    }
}

fn create_test_event(code: &str, country: &str) -> ClickEvent {
    ClickEvent {
        id: uuid::Uuid::new_v4().to_string(),
        code: code.to_string(),
        ip_address: Some("203.0.113.0".to_string()),
        user_agent: Some("Mozilla/5.0 Chrome".to_string()),
        referrer: None,
        country: country.to_string(),
        city: "Unknown".to_string(),
        device_type: Some(DeviceType::Desktop),
        browser: Some("Chrome".to_string()),
        os: Some("Windows".to_string()),
        clicked_at: Utc::now(),
    }
}

// =============================================================================
// LinkStore
// =============================================================================

#[tokio::test]
async fn test_insert_and_get() {
    let store = MemoryStore::new();
    store.insert(create_test_link("abc123", "alice")).await.unwrap();

    let link = store.get("abc123").await.unwrap().unwrap();
    assert_eq!(link.code, "abc123");
    assert_eq!(link.target, "https://abc123.example.com");
    assert!(link.active);

    assert!(store.get("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_insert_rejected() {
    let store = MemoryStore::new();
    store.insert(create_test_link("abc123", "alice")).await.unwrap();

    let err = store
        .insert(create_test_link("abc123", "bob"))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkletError::DuplicateCode(_)));

    // Original row survives.
    let link = store.get("abc123").await.unwrap().unwrap();
    assert_eq!(link.owner, "alice");
}

#[tokio::test]
async fn test_exists_covers_soft_deleted() {
    let store = MemoryStore::new();
    store.insert(create_test_link("abc123", "alice")).await.unwrap();
    store.deactivate("abc123").await.unwrap();

    assert!(store.exists("abc123").await.unwrap());
    assert!(!store.exists("other0").await.unwrap());
}

#[tokio::test]
async fn test_deactivate_keeps_row() {
    let store = MemoryStore::new();
    store.insert(create_test_link("abc123", "alice")).await.unwrap();
    store.deactivate("abc123").await.unwrap();

    let link = store.get("abc123").await.unwrap().unwrap();
    assert!(!link.active);
    assert_eq!(link.click_count, 0);
}

#[tokio::test]
async fn test_deactivate_missing_is_not_found() {
    let store = MemoryStore::new();
    let err = store.deactivate("missing").await.unwrap_err();
    assert!(matches!(err, LinkletError::NotFound(_)));
}

#[tokio::test]
async fn test_increment_clicks_batch() {
    let store = MemoryStore::new();
    store.insert(create_test_link("abc123", "alice")).await.unwrap();
    store.insert(create_test_link("def456", "alice")).await.unwrap();

    store
        .increment_clicks(&[
            ("abc123".to_string(), 3),
            ("def456".to_string(), 1),
            ("ghost0".to_string(), 7),
        ])
        .await
        .unwrap();

    assert_eq!(store.get("abc123").await.unwrap().unwrap().click_count, 3);
    assert_eq!(store.get("def456").await.unwrap().unwrap().click_count, 1);

    store
        .increment_clicks(&[("abc123".to_string(), 2)])
        .await
        .unwrap();
    assert_eq!(store.get("abc123").await.unwrap().unwrap().click_count, 5);
}

#[tokio::test]
async fn test_count_active_by_owner() {
    let store = MemoryStore::new();
    store.insert(create_test_link("aaa111", "alice")).await.unwrap();
    store.insert(create_test_link("bbb222", "alice")).await.unwrap();
    store.insert(create_test_link("ccc333", "bob")).await.unwrap();
    store.deactivate("bbb222").await.unwrap();

    assert_eq!(store.count_active_by_owner("alice").await.unwrap(), 1);
    assert_eq!(store.count_active_by_owner("bob").await.unwrap(), 1);
    assert_eq!(store.count_active_by_owner("nobody").await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_by_owner_includes_soft_deleted() {
    let store = MemoryStore::new();
    store.insert(create_test_link("aaa111", "alice")).await.unwrap();
    store.insert(create_test_link("bbb222", "alice")).await.unwrap();
    store.deactivate("bbb222").await.unwrap();

    let links = store.list_by_owner("alice").await.unwrap();
    assert_eq!(links.len(), 2);
}

// =============================================================================
// ClickStore
// =============================================================================

#[tokio::test]
async fn test_append_and_count() {
    let store = MemoryStore::new();
    store.append(create_test_event("abc123", "Germany")).await.unwrap();
    store.append(create_test_event("abc123", "France")).await.unwrap();
    store.append(create_test_event("def456", "Japan")).await.unwrap();

    assert_eq!(store.count_for_code("abc123").await.unwrap(), 2);
    assert_eq!(store.count_for_code("def456").await.unwrap(), 1);
    assert_eq!(store.count_for_code("missing").await.unwrap(), 0);
}

#[tokio::test]
async fn test_count_since_window() {
    let store = MemoryStore::new();

    let mut old_event = create_test_event("abc123", "Germany");
    old_event.clicked_at = Utc::now() - Duration::days(10);
    store.append(old_event).await.unwrap();
    store.append(create_test_event("abc123", "France")).await.unwrap();

    let week_ago = Utc::now() - Duration::days(7);
    assert_eq!(store.count_since("abc123", week_ago).await.unwrap(), 1);
    assert_eq!(store.count_for_code("abc123").await.unwrap(), 2);
}

#[tokio::test]
async fn test_events_for_code() {
    let store = MemoryStore::new();
    store.append(create_test_event("abc123", "Germany")).await.unwrap();

    let events = store.events_for_code("abc123").await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].country, "Germany");

    assert!(store.events_for_code("missing").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_link_expiry_helper() {
    let mut link = create_test_link("abc123", "alice");
    assert!(!link.is_expired());

    link.expires_at = Some(Utc::now() + Duration::hours(1));
    assert!(!link.is_expired());

    link.expires_at = Some(Utc::now() - Duration::seconds(1));
    assert!(link.is_expired());
}
