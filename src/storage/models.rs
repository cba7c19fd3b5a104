use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short link record.
///
/// `code` is immutable once assigned and globally unique across every link
/// ever created, soft-deleted ones included. Deletion flips `active` to
/// false; rows are never physically removed so the code can never be
/// reassigned to a different target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortLink {
    pub code: String,
    pub target: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Opaque owner identity supplied by the external auth system.
    pub owner: String,
    pub active: bool,
    pub click_count: u64,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShortLink {
    pub fn is_expired(&self) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at <= Utc::now())
    }
}

/// Device class derived from the user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
    Bot,
    Other,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "Desktop",
            DeviceType::Mobile => "Mobile",
            DeviceType::Tablet => "Tablet",
            DeviceType::Bot => "Bot",
            DeviceType::Other => "Other",
        }
    }
}

/// One recorded click, immutable once written.
///
/// References its link through `code` only; events are kept even after the
/// link is soft-deleted. `ip_address` holds the anonymized form (last octet
/// zeroed for dotted quads). The classification fields stay unset when no
/// user-agent string was presented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickEvent {
    pub id: String,
    pub code: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub country: String,
    pub city: String,
    pub device_type: Option<DeviceType>,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub clicked_at: DateTime<Utc>,
}
