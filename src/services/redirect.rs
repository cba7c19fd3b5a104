//! Redirect resolution.
//!
//! Validation pipeline, in order and short-circuiting: length band →
//! reserved path → cache-aside lookup → active flag → expiry. On success,
//! click recording and the counter increment are scheduled without blocking
//! the redirect decision.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::click::{ClickCounter, ClickRecorder};
use crate::cache::{CacheResult, LinkCache};
use crate::storage::{LinkStore, ShortLink};

/// Accepted short-code length band. Codes are allocated at 6 today; the
/// band leaves room for longer codes without touching the resolver.
pub const MIN_CODE_LENGTH: usize = 6;
pub const MAX_CODE_LENGTH: usize = 8;

/// Path segments owned by functional routes; the redirect route must never
/// shadow them.
const RESERVED_PATHS: &[&str] = &[
    "api",
    "health",
    "preview",
    "metrics",
    "static",
    "assets",
    "debug",
    "favicon.ico",
];

#[derive(Debug, Clone, PartialEq)]
pub enum RedirectOutcome {
    Redirect(String),
    NotFound,
    Gone,
}

/// Client request details forwarded to the click recorder.
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

pub struct RedirectResolver {
    store: Arc<dyn LinkStore>,
    cache: Arc<dyn LinkCache>,
    recorder: ClickRecorder,
    counter: Arc<ClickCounter>,
}

impl RedirectResolver {
    pub fn new(
        store: Arc<dyn LinkStore>,
        cache: Arc<dyn LinkCache>,
        recorder: ClickRecorder,
        counter: Arc<ClickCounter>,
    ) -> Self {
        Self {
            store,
            cache,
            recorder,
            counter,
        }
    }

    #[instrument(skip(self, ctx), fields(code = %code))]
    pub async fn resolve(&self, code: &str, ctx: ClientContext) -> RedirectOutcome {
        if code.len() < MIN_CODE_LENGTH || code.len() > MAX_CODE_LENGTH {
            debug!("code length outside accepted band");
            return RedirectOutcome::NotFound;
        }

        if RESERVED_PATHS.contains(&code) {
            debug!("code collides with a reserved path");
            return RedirectOutcome::NotFound;
        }

        let link = match self.lookup(code).await {
            Some(link) => link,
            None => {
                debug!("short link not found");
                return RedirectOutcome::NotFound;
            }
        };

        // Soft-deleted links are indistinguishable from never-existing ones.
        if !link.active {
            debug!("link is soft-deleted");
            return RedirectOutcome::NotFound;
        }

        if link.is_expired() {
            debug!("link has expired");
            return RedirectOutcome::Gone;
        }

        // Best-effort side effects; neither blocks nor fails the redirect.
        self.counter.increment(&link.code);
        self.recorder.dispatch(&link, ctx);

        RedirectOutcome::Redirect(link.target.clone())
    }

    /// Cache-aside lookup: cache first, read through to the store on a
    /// miss and populate before returning. Store errors degrade to a miss.
    async fn lookup(&self, code: &str) -> Option<ShortLink> {
        match self.cache.get(code).await {
            CacheResult::Found(link) => Some(link),
            CacheResult::Miss => match self.store.get(code).await {
                Ok(Some(link)) => {
                    self.cache.insert(code.to_string(), link.clone()).await;
                    Some(link)
                }
                Ok(None) => None,
                Err(e) => {
                    warn!("link store lookup failed for {code}: {e}");
                    None
                }
            },
        }
    }
}
