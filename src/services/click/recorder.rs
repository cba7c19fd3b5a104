//! Click-event recording.
//!
//! `dispatch` is the fire-and-forget entry point used by the redirect path:
//! it spawns the enrichment pipeline and never reports back. Failures are
//! logged and discarded at that boundary, so the contract is visible in the
//! signatures rather than buried in a catch-all. Once shutdown begins, no
//! new recording work is started; already-spawned work runs to completion.

use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::user_agent::classify;
use crate::services::geoip::GeoIpLookup;
use crate::services::redirect::ClientContext;
use crate::storage::{ClickEvent, ClickStore, ShortLink};
use crate::utils::{anonymize_ip, is_private_or_local};

const UNKNOWN: &str = "Unknown";

pub struct ClickRecorder {
    clicks: Arc<dyn ClickStore>,
    geoip: Arc<dyn GeoIpLookup>,
    accepting: Arc<AtomicBool>,
}

impl Clone for ClickRecorder {
    fn clone(&self) -> Self {
        Self {
            clicks: Arc::clone(&self.clicks),
            geoip: Arc::clone(&self.geoip),
            accepting: Arc::clone(&self.accepting),
        }
    }
}

impl ClickRecorder {
    pub fn new(clicks: Arc<dyn ClickStore>, geoip: Arc<dyn GeoIpLookup>) -> Self {
        Self {
            clicks,
            geoip,
            accepting: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Stop accepting new recording work. Clones share the gate.
    pub fn shutdown(&self) {
        self.accepting.store(false, Ordering::Release);
    }

    /// Schedule recording of one click. Returns immediately; the caller
    /// never observes the outcome.
    pub fn dispatch(&self, link: &ShortLink, ctx: ClientContext) {
        if !self.accepting.load(Ordering::Acquire) {
            debug!(code = %link.code, "recorder is shut down, dropping click");
            return;
        }

        let recorder = self.clone();
        let code = link.code.clone();
        tokio::spawn(async move {
            if let Err(e) = recorder.record(&code, ctx).await {
                warn!("click recording for {code} failed: {e:#}");
            }
        });
    }

    /// Enrich and persist one click event. The event is written even when
    /// enrichment only partially succeeds.
    pub async fn record(&self, code: &str, ctx: ClientContext) -> anyhow::Result<()> {
        let (country, city) = self.locate(ctx.ip.as_deref()).await;

        let ua_info = ctx
            .user_agent
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(classify);

        let event = ClickEvent {
            id: Uuid::new_v4().to_string(),
            code: code.to_string(),
            ip_address: ctx.ip.as_deref().map(anonymize_ip),
            user_agent: ctx.user_agent,
            referrer: ctx.referrer,
            country,
            city,
            device_type: ua_info.as_ref().map(|u| u.device),
            browser: ua_info.as_ref().map(|u| u.browser.to_string()),
            os: ua_info.as_ref().map(|u| u.os.to_string()),
            clicked_at: Utc::now(),
        };

        self.clicks.append(event).await?;
        debug!(%code, "click event recorded");
        Ok(())
    }

    /// Best-effort geolocation. Private and loopback ranges short-circuit
    /// to Unknown/Unknown without a network call.
    async fn locate(&self, ip: Option<&str>) -> (String, String) {
        let unknown = || (UNKNOWN.to_string(), UNKNOWN.to_string());

        let Some(ip) = ip else {
            return unknown();
        };

        match ip.parse::<IpAddr>() {
            Ok(addr) if !is_private_or_local(&addr) => match self.geoip.lookup(ip).await {
                Some(geo) => (
                    geo.country.unwrap_or_else(|| UNKNOWN.to_string()),
                    geo.city.unwrap_or_else(|| UNKNOWN.to_string()),
                ),
                None => unknown(),
            },
            _ => unknown(),
        }
    }
}
