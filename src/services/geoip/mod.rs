//! GeoIP 服务模块
//!
//! IP → 国家/城市查询，外部 HTTP API 实现（如 ip-api.com），未配置时禁用。

mod external_api;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

pub use external_api::ExternalApiProvider;

use crate::config::GeoIpConfig;

/// 地理位置信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoInfo {
    pub country: Option<String>,
    pub city: Option<String>,
}

#[async_trait]
pub trait GeoIpLookup: Send + Sync {
    /// 查询 IP 地址的地理位置，失败返回 None
    async fn lookup(&self, ip: &str) -> Option<GeoInfo>;

    fn name(&self) -> &'static str;
}

/// Lookup that always misses; used when no API URL is configured.
pub struct NullGeoIp;

#[async_trait]
impl GeoIpLookup for NullGeoIp {
    async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
        None
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

pub fn provider_from_config(config: &GeoIpConfig) -> Arc<dyn GeoIpLookup> {
    match &config.api_url {
        Some(url) => {
            info!("GeoIP: using external API provider");
            Arc::new(ExternalApiProvider::new(url))
        }
        None => {
            debug!("GeoIP: no API URL configured, lookups disabled");
            Arc::new(NullGeoIp)
        }
    }
}
