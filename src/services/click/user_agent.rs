//! User-agent classification.
//!
//! Case-insensitive substring ladders with fixed precedence; the first
//! matching marker wins. Deliberately coarse: this feeds analytics
//! breakdowns, not feature detection.

use crate::storage::DeviceType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentInfo {
    pub device: DeviceType,
    pub browser: &'static str,
    pub os: &'static str,
}

/// Classify a non-empty user-agent string. Callers skip classification
/// entirely when no user-agent was presented.
pub fn classify(user_agent: &str) -> UserAgentInfo {
    let ua = user_agent.to_lowercase();

    let device = if ua.contains("mobile") || ua.contains("android") || ua.contains("iphone") {
        DeviceType::Mobile
    } else if ua.contains("tablet") || ua.contains("ipad") {
        DeviceType::Tablet
    } else if ua.contains("bot") || ua.contains("crawler") || ua.contains("spider") {
        DeviceType::Bot
    } else {
        DeviceType::Desktop
    };

    let browser = if ua.contains("chrome") {
        "Chrome"
    } else if ua.contains("firefox") {
        "Firefox"
    } else if ua.contains("safari") {
        "Safari"
    } else if ua.contains("edge") {
        "Edge"
    } else {
        "Other"
    };

    let os = if ua.contains("windows") {
        "Windows"
    } else if ua.contains("mac") {
        "macOS"
    } else if ua.contains("linux") {
        "Linux"
    } else if ua.contains("android") {
        "Android"
    } else if ua.contains("iphone") || ua.contains("ipad") {
        "iOS"
    } else {
        "Other"
    };

    UserAgentInfo {
        device,
        browser,
        os,
    }
}
