//! Analytics aggregation.
//!
//! Reports are assembled section by section and degrade gracefully: a
//! failed aggregation step is logged and the partial report built up to
//! that point is returned. This mirrors the best-effort stance of the
//! click recorder, surfaced here in the return flow instead of a
//! catch-all.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::warn;

use crate::errors::{LinkletError, Result};
use crate::storage::{ClickEvent, ClickStore, LinkStore};

pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Breakdowns are capped to the ten largest buckets.
const TOP_BUCKETS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct DailyClicks {
    pub date: NaiveDate,
    pub clicks: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketStat {
    pub name: String,
    pub clicks: u64,
    /// `clicks * 100.0 / total_clicks`, 0.0 when there are no clicks.
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    /// Short code, or "dashboard" for owner-scoped summaries.
    pub scope: String,
    pub total_clicks: u64,
    pub clicks_today: u64,
    pub clicks_this_week: u64,
    pub clicks_this_month: u64,
    /// One point per calendar day with at least one event; days without
    /// events are absent, not zero-filled.
    pub daily_clicks: Vec<DailyClicks>,
    pub top_countries: Vec<BucketStat>,
    pub browser_stats: Vec<BucketStat>,
    pub device_stats: Vec<BucketStat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_links: Option<u64>,
}

impl AnalyticsReport {
    fn new(scope: &str) -> Self {
        Self {
            scope: scope.to_string(),
            total_clicks: 0,
            clicks_today: 0,
            clicks_this_week: 0,
            clicks_this_month: 0,
            daily_clicks: Vec::new(),
            top_countries: Vec::new(),
            browser_stats: Vec::new(),
            device_stats: Vec::new(),
            total_links: None,
        }
    }
}

pub struct AnalyticsService {
    links: Arc<dyn LinkStore>,
    clicks: Arc<dyn ClickStore>,
}

impl AnalyticsService {
    pub fn new(links: Arc<dyn LinkStore>, clicks: Arc<dyn ClickStore>) -> Self {
        Self { links, clicks }
    }

    /// Per-code report. The 1/7/30-day windows are fixed; `window_days`
    /// only sizes the daily series. Soft-deleted links stay queryable —
    /// their history outlives them.
    pub async fn url_analytics(&self, code: &str, window_days: i64) -> Result<AnalyticsReport> {
        if self.links.get(code).await?.is_none() {
            return Err(LinkletError::not_found(format!(
                "short link not found: {code}"
            )));
        }

        let mut report = AnalyticsReport::new(code);
        let now = Utc::now();

        match self.clicks.count_for_code(code).await {
            Ok(total) => report.total_clicks = total,
            Err(e) => {
                warn!("analytics: total count for {code} failed: {e}");
                return Ok(report);
            }
        }

        match self.window_counts(code, now).await {
            Ok((today, week, month)) => {
                report.clicks_today = today;
                report.clicks_this_week = week;
                report.clicks_this_month = month;
            }
            Err(e) => {
                warn!("analytics: window counts for {code} failed: {e}");
                return Ok(report);
            }
        }

        let events = match self.clicks.events_for_code(code).await {
            Ok(events) => events,
            Err(e) => {
                warn!("analytics: event fetch for {code} failed: {e}");
                return Ok(report);
            }
        };

        report.daily_clicks = daily_series(&events, now - Duration::days(window_days));

        let total = report.total_clicks;
        report.top_countries =
            top_buckets(events.iter().map(|e| Some(e.country.clone())), total);
        report.browser_stats = top_buckets(events.iter().map(|e| e.browser.clone()), total);
        report.device_stats = top_buckets(
            events
                .iter()
                .map(|e| e.device_type.map(|d| d.as_str().to_string())),
            total,
        );

        Ok(report)
    }

    /// Owner-scoped summary: total clicks and active link count across the
    /// owner's links. Best-effort like the per-code report.
    pub async fn user_dashboard(&self, owner: &str) -> Result<AnalyticsReport> {
        let mut report = AnalyticsReport::new("dashboard");

        match self.links.list_by_owner(owner).await {
            Ok(links) => {
                let active: Vec<_> = links.iter().filter(|l| l.active).collect();
                report.total_clicks = active.iter().map(|l| l.click_count).sum();
                report.total_links = Some(active.len() as u64);
            }
            Err(e) => {
                warn!("analytics: dashboard for owner {owner} failed: {e}");
            }
        }

        Ok(report)
    }

    async fn window_counts(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<(u64, u64, u64)> {
        let today = self.clicks.count_since(code, now - Duration::days(1)).await?;
        let week = self.clicks.count_since(code, now - Duration::days(7)).await?;
        let month = self
            .clicks
            .count_since(code, now - Duration::days(30))
            .await?;
        Ok((today, week, month))
    }
}

fn daily_series(events: &[ClickEvent], since: DateTime<Utc>) -> Vec<DailyClicks> {
    let mut days: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for event in events.iter().filter(|e| e.clicked_at >= since) {
        *days.entry(event.clicked_at.date_naive()).or_insert(0) += 1;
    }
    days.into_iter()
        .map(|(date, clicks)| DailyClicks { date, clicks })
        .collect()
}

/// Count, rank and percentage the given bucket values. `None` values
/// (events without a classification) are skipped, so percentages stay
/// relative to total clicks and sum to at most 100.
fn top_buckets(values: impl Iterator<Item = Option<String>>, total_clicks: u64) -> Vec<BucketStat> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for value in values.flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut stats: Vec<BucketStat> = counts
        .into_iter()
        .map(|(name, clicks)| {
            let percentage = if total_clicks > 0 {
                clicks as f64 * 100.0 / total_clicks as f64
            } else {
                0.0
            };
            BucketStat {
                name,
                clicks,
                percentage,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.clicks.cmp(&a.clicks).then_with(|| a.name.cmp(&b.name)));
    stats.truncate(TOP_BUCKETS);
    stats
}
