//! 客户端 IP 工具
//!
//! 提取、匿名化与私有地址判断。

use std::net::{IpAddr, SocketAddr};

use actix_web::http::header::HeaderMap;
use actix_web::HttpRequest;

/// 检查 IP 是否为私有地址或 localhost
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            // fc00::/7 (ULA), fe80::/10 (link-local), ::1
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}

/// Anonymize a client address down to network-prefix granularity.
///
/// Dotted-quad addresses get their last octet zeroed; every other format is
/// returned unchanged.
pub fn anonymize_ip(ip: &str) -> String {
    let parts: Vec<&str> = ip.split('.').collect();
    if parts.len() == 4 {
        format!("{}.{}.{}.0", parts[0], parts[1], parts[2])
    } else {
        ip.to_string()
    }
}

/// 从请求头提取转发的 IP（X-Forwarded-For 或 X-Real-IP）
pub fn extract_forwarded_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(String::from)
        })
}

/// Best-effort client IP: forwarded headers first, then the peer address
/// with any port stripped.
pub fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    extract_forwarded_ip(req.headers()).or_else(|| {
        req.connection_info().peer_addr().map(|peer| {
            match peer.parse::<SocketAddr>() {
                Ok(addr) => addr.ip().to_string(),
                Err(_) => peer.to_string(),
            }
        })
    })
}
