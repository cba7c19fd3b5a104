//! Target URL validation.
//!
//! Only absolute http/https URLs are accepted; dangerous schemes are
//! rejected outright.

use url::Url;

use crate::errors::{LinkletError, Result};

/// 危险协议列表
const DANGEROUS_SCHEMES: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// Validate a redirect target.
///
/// Checks, in order: non-empty, not a dangerous scheme, http/https prefix,
/// parseable as an absolute URL.
pub fn validate_target_url(target: &str) -> Result<()> {
    let target = target.trim();

    if target.is_empty() {
        return Err(LinkletError::validation("target URL cannot be empty"));
    }

    let lower = target.to_lowercase();

    for scheme in DANGEROUS_SCHEMES {
        if lower.starts_with(scheme) {
            return Err(LinkletError::validation(format!(
                "target URL scheme is not allowed: {scheme}"
            )));
        }
    }

    if !lower.starts_with("http://") && !lower.starts_with("https://") {
        return Err(LinkletError::validation(
            "target URL must start with http:// or https://",
        ));
    }

    Url::parse(target)
        .map_err(|e| LinkletError::validation(format!("invalid target URL: {e}")))?;

    Ok(())
}
