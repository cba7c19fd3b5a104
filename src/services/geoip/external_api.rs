//! External GeoIP API provider.
//!
//! Blocking `ureq` calls driven through `spawn_blocking`, fronted by a moka
//! cache whose `get_with` gives singleflight semantics: concurrent lookups
//! of the same IP issue one HTTP request.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{trace, warn};
use ureq::Agent;

use super::{GeoInfo, GeoIpLookup};

const CACHE_TTL_SECS: u64 = 15 * 60;
const CACHE_MAX_CAPACITY: u64 = 10_000;
const HTTP_TIMEOUT_SECS: u64 = 2;

static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

fn get_agent() -> &'static Agent {
    HTTP_AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            .build()
            .into()
    })
}

pub struct ExternalApiProvider {
    /// URL template with `{ip}` as placeholder, e.g.
    /// `http://ip-api.com/json/{ip}?fields=status,country,city`
    url_template: String,
    /// IP → GeoInfo; `None` entries are negative cache hits.
    cache: Cache<String, Option<GeoInfo>>,
}

impl ExternalApiProvider {
    pub fn new(url_template: &str) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(CACHE_TTL_SECS))
            .max_capacity(CACHE_MAX_CAPACITY)
            .build();

        Self {
            url_template: url_template.to_string(),
            cache,
        }
    }

    fn fetch_sync(url: String) -> Option<GeoInfo> {
        let agent = get_agent();

        let resp = match agent.get(&url).call() {
            Ok(r) => r,
            Err(e) => {
                warn!("GeoIP API request to \"{url}\" failed: {e}");
                return None;
            }
        };

        let json: serde_json::Value = match resp.into_body().read_json() {
            Ok(j) => j,
            Err(e) => {
                warn!("GeoIP API response from \"{url}\" parse failed: {e}");
                return None;
            }
        };

        // ip-api.com signals lookup failure with {"status": "fail", ...}
        if json["status"].as_str() == Some("fail") {
            trace!("GeoIP API returned fail status");
            return None;
        }

        let country = json["country"]
            .as_str()
            .or_else(|| json["countryCode"].as_str())
            .or_else(|| json["country_code"].as_str())
            .map(String::from);

        let city = json["city"].as_str().map(String::from);

        trace!("GeoIP API lookup: country={country:?}, city={city:?}");
        Some(GeoInfo { country, city })
    }

    async fn fetch(&self, ip: &str) -> Option<GeoInfo> {
        let url = self.url_template.replace("{ip}", ip);

        tokio::task::spawn_blocking(move || Self::fetch_sync(url))
            .await
            .unwrap_or_else(|e| {
                warn!("GeoIP spawn_blocking failed: {e}");
                None
            })
    }
}

#[async_trait]
impl GeoIpLookup for ExternalApiProvider {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        let key = ip.to_string();
        self.cache
            .get_with(key, async {
                trace!("GeoIP cache miss for {ip}, fetching from API");
                self.fetch(ip).await
            })
            .await
    }

    fn name(&self) -> &'static str {
        "external-api"
    }
}
