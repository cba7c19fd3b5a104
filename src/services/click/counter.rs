//! Buffered click-count increments.
//!
//! Redirect workers bump an in-memory counter; a background task drains the
//! buffer on an interval and applies the deltas as one batched store write,
//! then invalidates the touched cache entries. The store write is always
//! sequenced before the invalidation. Counter staleness between flushes is
//! accepted; redirect legality never depends on the counter.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::cache::LinkCache;
use crate::storage::LinkStore;

pub struct ClickCounter {
    buffer: DashMap<String, u64>,
    flushing: AtomicBool,
    store: Arc<dyn LinkStore>,
    cache: Arc<dyn LinkCache>,
    flush_interval: Duration,
}

impl ClickCounter {
    pub fn new(
        store: Arc<dyn LinkStore>,
        cache: Arc<dyn LinkCache>,
        flush_interval: Duration,
    ) -> Self {
        Self {
            buffer: DashMap::new(),
            flushing: AtomicBool::new(false),
            store,
            cache,
            flush_interval,
        }
    }

    /// 增加点击计数（线程安全，无锁）
    pub fn increment(&self, code: &str) {
        *self.buffer.entry(code.to_string()).or_insert(0) += 1;
    }

    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Periodic flush loop; run as a background task.
    pub async fn run(self: Arc<Self>) {
        loop {
            sleep(self.flush_interval).await;
            self.flush().await;
        }
    }

    /// Drain buffered deltas and apply them as one batched increment.
    pub async fn flush(&self) {
        if self.flushing.swap(true, Ordering::SeqCst) {
            debug!("click flush already in progress, skipping");
            return;
        }

        // Key-atomic drain: increments landing after a key's removal go to
        // the next flush.
        let keys: Vec<String> = self.buffer.iter().map(|e| e.key().clone()).collect();
        let mut deltas = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some((code, count)) = self.buffer.remove(&key) {
                deltas.push((code, count));
            }
        }

        if deltas.is_empty() {
            self.flushing.store(false, Ordering::SeqCst);
            return;
        }

        match self.store.increment_clicks(&deltas).await {
            Ok(()) => {
                for (code, _) in &deltas {
                    self.cache.remove(code).await;
                }
                debug!(batch = deltas.len(), "flushed click deltas");
            }
            Err(e) => {
                warn!("failed to flush {} click deltas: {e}", deltas.len());
            }
        }

        self.flushing.store(false, Ordering::SeqCst);
    }
}
