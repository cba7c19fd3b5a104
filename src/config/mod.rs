//! Environment-driven configuration.
//!
//! Everything is read once at startup and constructor-injected into the
//! services; nothing reads the environment after boot.

use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// Base URL used to compose fully-qualified short links.
    pub base_url: String,
    pub cache: CacheConfig,
    pub clicks: ClickConfig,
    pub geoip: GeoIpConfig,
    pub quotas: QuotaConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_capacity: u64,
    /// TTL safety net against missed invalidations.
    pub default_ttl_secs: u64,
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }
}

#[derive(Debug, Clone)]
pub struct ClickConfig {
    pub flush_interval_secs: u64,
}

impl ClickConfig {
    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs)
    }
}

#[derive(Debug, Clone)]
pub struct GeoIpConfig {
    /// External lookup URL template with an `{ip}` placeholder. Unset
    /// disables geolocation entirely.
    pub api_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// EnvFilter directive string, e.g. "info" or "linklet=debug,info".
    pub level: String,
    /// "text" (default) or "json".
    pub format: String,
    /// Log file path; unset logs to stdout.
    pub file: Option<String>,
}

/// Max active links per owner, by tier. `None` means unlimited.
#[derive(Debug, Clone)]
pub struct QuotaConfig {
    pub free: Option<u64>,
    pub premium: Option<u64>,
    pub enterprise: Option<u64>,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free: Some(100),
            premium: Some(10_000),
            enterprise: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = QuotaConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("LINKLET_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env_parse("LINKLET_PORT", 8080),
            },
            base_url: env::var("LINKLET_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            cache: CacheConfig {
                enabled: env_parse("CACHE_ENABLED", true),
                max_capacity: env_parse("CACHE_MAX_CAPACITY", 10_000),
                default_ttl_secs: env_parse("CACHE_DEFAULT_TTL", 300),
            },
            clicks: ClickConfig {
                flush_interval_secs: env_parse("CLICK_FLUSH_INTERVAL", 10),
            },
            geoip: GeoIpConfig {
                api_url: env::var("GEOIP_API_URL").ok().filter(|s| !s.is_empty()),
            },
            quotas: QuotaConfig {
                free: env_quota("QUOTA_FREE", defaults.free),
                premium: env_quota("QUOTA_PREMIUM", defaults.premium),
                enterprise: env_quota("QUOTA_ENTERPRISE", defaults.enterprise),
            },
            logging: LoggingConfig {
                level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
                file: env::var("LOG_FILE").ok().filter(|s| !s.is_empty()),
            },
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Quota values accept a number or "unlimited".
fn env_quota(key: &str, default: Option<u64>) -> Option<u64> {
    match env::var(key) {
        Ok(v) if v.eq_ignore_ascii_case("unlimited") => None,
        Ok(v) => v.parse().ok().or(default),
        Err(_) => default,
    }
}
