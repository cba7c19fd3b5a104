//! Short-code allocation.
//!
//! Codes are drawn uniformly from a 62-character alphabet with a CSPRNG
//! (`rand::rng()` is ChaCha-based and OS-seeded), so they are
//! guessable-resistant rather than sequential. Uniqueness is checked against
//! the link store before a code is handed out; the store's unique-constraint
//! insert remains the final arbiter under concurrency.

use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use crate::errors::{LinkletError, Result};
use crate::storage::LinkStore;

pub const CODE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub const CODE_LENGTH: usize = 6;

/// Generation attempts before giving up with `AllocationExhausted`.
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 5;

/// Generate one candidate code; no uniqueness guarantee.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

pub struct CodeAllocator {
    store: Arc<dyn LinkStore>,
}

impl CodeAllocator {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }

    /// Produce a code absent from the store at the time of the check.
    ///
    /// Two concurrent allocations can still race past this check with the
    /// same candidate; the caller must treat a duplicate-code insert
    /// rejection as a collision and try again.
    pub async fn allocate(&self) -> Result<String> {
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let code = generate_code();
            if !self.store.exists(&code).await? {
                return Ok(code);
            }
            debug!(%code, attempt, "generated code already taken, retrying");
        }
        Err(LinkletError::allocation_exhausted(format!(
            "unable to allocate a unique code after {MAX_ALLOCATION_ATTEMPTS} attempts"
        )))
    }
}
