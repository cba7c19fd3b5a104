//! In-memory backend for [`LinkStore`] and [`ClickStore`].
//!
//! `DashMap` gives entry-level atomicity: duplicate-code rejection and
//! click-count increments both happen under the shard lock, so concurrent
//! inserts of the same candidate code cannot both succeed and concurrent
//! increments cannot lose updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use super::{ClickEvent, ClickStore, LinkStore, ShortLink};
use crate::errors::{LinkletError, Result};

#[derive(Default)]
pub struct MemoryStore {
    links: DashMap<String, ShortLink>,
    /// Events indexed by link code for reverse lookup.
    events: DashMap<String, Vec<ClickEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn get(&self, code: &str) -> Result<Option<ShortLink>> {
        Ok(self.links.get(code).map(|entry| entry.value().clone()))
    }

    async fn exists(&self, code: &str) -> Result<bool> {
        Ok(self.links.contains_key(code))
    }

    async fn insert(&self, link: ShortLink) -> Result<()> {
        match self.links.entry(link.code.clone()) {
            Entry::Occupied(_) => Err(LinkletError::duplicate_code(format!(
                "short code already exists: {}",
                link.code
            ))),
            Entry::Vacant(slot) => {
                slot.insert(link);
                Ok(())
            }
        }
    }

    async fn deactivate(&self, code: &str) -> Result<()> {
        match self.links.get_mut(code) {
            Some(mut entry) => {
                entry.active = false;
                entry.updated_at = Utc::now();
                Ok(())
            }
            None => Err(LinkletError::not_found(format!(
                "short link not found: {code}"
            ))),
        }
    }

    async fn increment_clicks(&self, deltas: &[(String, u64)]) -> Result<()> {
        for (code, delta) in deltas {
            match self.links.get_mut(code) {
                Some(mut entry) => {
                    entry.click_count += delta;
                    entry.updated_at = Utc::now();
                }
                None => {
                    debug!(%code, delta, "dropping click delta for unknown code");
                }
            }
        }
        Ok(())
    }

    async fn count_active_by_owner(&self, owner: &str) -> Result<u64> {
        Ok(self
            .links
            .iter()
            .filter(|entry| entry.owner == owner && entry.active)
            .count() as u64)
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<ShortLink>> {
        Ok(self
            .links
            .iter()
            .filter(|entry| entry.owner == owner)
            .map(|entry| entry.value().clone())
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl ClickStore for MemoryStore {
    async fn append(&self, event: ClickEvent) -> Result<()> {
        self.events.entry(event.code.clone()).or_default().push(event);
        Ok(())
    }

    async fn count_for_code(&self, code: &str) -> Result<u64> {
        Ok(self.events.get(code).map_or(0, |events| events.len() as u64))
    }

    async fn count_since(&self, code: &str, since: DateTime<Utc>) -> Result<u64> {
        Ok(self.events.get(code).map_or(0, |events| {
            events.iter().filter(|e| e.clicked_at >= since).count() as u64
        }))
    }

    async fn events_for_code(&self, code: &str) -> Result<Vec<ClickEvent>> {
        Ok(self
            .events
            .get(code)
            .map_or_else(Vec::new, |events| events.clone()))
    }
}
