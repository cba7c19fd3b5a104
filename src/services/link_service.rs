//! Link management service
//!
//! Create, soft-delete and preview operations shared by the HTTP handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::allocator::{CodeAllocator, MAX_ALLOCATION_ATTEMPTS};
use super::Owner;
use crate::cache::LinkCache;
use crate::config::QuotaConfig;
use crate::errors::{LinkletError, Result};
use crate::storage::{LinkStore, ShortLink};
use crate::utils::validate_target_url;

pub const MAX_TITLE_LENGTH: usize = 500;
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

#[derive(Debug, Clone)]
pub struct CreateLinkRequest {
    pub target: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

pub struct LinkService {
    store: Arc<dyn LinkStore>,
    cache: Arc<dyn LinkCache>,
    allocator: CodeAllocator,
    quotas: QuotaConfig,
}

impl LinkService {
    pub fn new(
        store: Arc<dyn LinkStore>,
        cache: Arc<dyn LinkCache>,
        quotas: QuotaConfig,
    ) -> Self {
        let allocator = CodeAllocator::new(store.clone());
        Self {
            store,
            cache,
            allocator,
            quotas,
        }
    }

    /// Validate the request, check the owner's quota, then allocate and
    /// insert. An insert rejected by the unique constraint counts as a
    /// collision and triggers another allocation attempt.
    pub async fn create(&self, req: CreateLinkRequest, owner: &Owner) -> Result<ShortLink> {
        validate_target_url(&req.target)?;

        if let Some(title) = &req.title {
            if title.chars().count() > MAX_TITLE_LENGTH {
                return Err(LinkletError::validation(format!(
                    "title must be at most {MAX_TITLE_LENGTH} characters"
                )));
            }
        }
        if let Some(description) = &req.description {
            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                return Err(LinkletError::validation(format!(
                    "description must be at most {MAX_DESCRIPTION_LENGTH} characters"
                )));
            }
        }

        self.check_quota(owner).await?;

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let code = self.allocator.allocate().await?;
            let now = Utc::now();
            let link = ShortLink {
                code,
                target: req.target.trim().to_string(),
                title: req.title.clone(),
                description: req.description.clone(),
                owner: owner.id.clone(),
                active: true,
                click_count: 0,
                expires_at: req.expires_at,
                created_at: now,
                updated_at: now,
            };

            match self.store.insert(link.clone()).await {
                Ok(()) => {
                    info!(code = %link.code, owner = %owner.id, "short link created");
                    return Ok(link);
                }
                Err(LinkletError::DuplicateCode(_)) => {
                    debug!(code = %link.code, attempt, "insert lost the allocation race, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(LinkletError::allocation_exhausted(format!(
            "unable to persist a unique code after {MAX_ALLOCATION_ATTEMPTS} attempts"
        )))
    }

    /// Soft delete. Only the owning identity may delete; the store write is
    /// sequenced before the cache invalidation so the next lookup sees the
    /// deactivated state.
    pub async fn delete(&self, code: &str, owner: &Owner) -> Result<()> {
        let link = self
            .store
            .get(code)
            .await?
            .ok_or_else(|| LinkletError::not_found(format!("short link not found: {code}")))?;

        if link.owner != owner.id {
            return Err(LinkletError::permission_denied(
                "you do not have permission to delete this link",
            ));
        }

        self.store.deactivate(code).await?;
        self.cache.remove(code).await;
        info!(%code, owner = %owner.id, "short link soft-deleted");
        Ok(())
    }

    /// Metadata lookup without redirecting or recording a click.
    /// Soft-deleted links are indistinguishable from never-existing ones.
    pub async fn preview(&self, code: &str) -> Result<ShortLink> {
        match self.store.get(code).await? {
            Some(link) if link.active => Ok(link),
            _ => Err(LinkletError::not_found(format!(
                "short link not found: {code}"
            ))),
        }
    }

    async fn check_quota(&self, owner: &Owner) -> Result<()> {
        let Some(limit) = owner.tier.max_active_links(&self.quotas) else {
            return Ok(());
        };
        let current = self.store.count_active_by_owner(&owner.id).await?;
        if current >= limit {
            return Err(LinkletError::validation(format!(
                "{} tier limit of {limit} active links reached",
                owner.tier
            )));
        }
        Ok(())
    }
}
