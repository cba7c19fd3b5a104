//! Business logic: allocation, link management, redirect resolution, click
//! recording and analytics aggregation.

pub mod allocator;
pub mod analytics;
pub mod click;
pub mod geoip;
pub mod link_service;
pub mod redirect;

use std::fmt;

use crate::config::QuotaConfig;

/// Opaque owner identity produced by the external auth system.
#[derive(Debug, Clone)]
pub struct Owner {
    pub id: String,
    pub tier: SubscriptionTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
    Enterprise,
}

impl SubscriptionTier {
    /// Unknown tier strings fall back to the most restrictive tier.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "premium" => SubscriptionTier::Premium,
            "enterprise" => SubscriptionTier::Enterprise,
            _ => SubscriptionTier::Free,
        }
    }

    /// `None` means unlimited.
    pub fn max_active_links(&self, quotas: &QuotaConfig) -> Option<u64> {
        match self {
            SubscriptionTier::Free => quotas.free,
            SubscriptionTier::Premium => quotas.premium,
            SubscriptionTier::Enterprise => quotas.enterprise,
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Premium => "premium",
            SubscriptionTier::Enterprise => "enterprise",
        };
        write!(f, "{name}")
    }
}
