//! Request extractors.

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use tracing::debug;

/// Single-value proxy headers consulted after `X-Forwarded-For`, in
/// trust order. The last three never carry a bare IP in practice but are
/// kept for parity with older proxy setups.
const PROXY_IP_HEADERS: [&str; 7] = [
    "CF-Connecting-IP",
    "True-Client-IP",
    "X-Real-IP",
    "X-Client-IP",
    "X-Forwarded",
    "Forwarded-For",
    "Forwarded",
];

/// Resolve the best-effort real client IP from request headers.
///
/// Priority order (one canonical order; do not mix heuristics):
/// 1. First entry of `X-Forwarded-For` — the original client by
///    convention — if it parses as an IP address.
/// 2. The first single-value proxy header holding a valid IP.
/// 3. The transport-layer peer address.
///
/// Always terminates with some string; empty only when even the peer
/// address is unknown. Decision points are logged at debug level to
/// support tracking down misattributed IPs.
pub fn client_ip_from_headers(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    if let Some(xff) = headers.get("X-Forwarded-For").and_then(|v| v.to_str().ok()) {
        if let Some(first) = xff.split(',').next() {
            let candidate = first.trim();
            if candidate.parse::<IpAddr>().is_ok() {
                debug!(header = "X-Forwarded-For", ip = candidate, full = xff, "resolved client ip");
                return candidate.to_string();
            }
        }
    }

    for name in PROXY_IP_HEADERS {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            let candidate = value.trim();
            if candidate.parse::<IpAddr>().is_ok() {
                debug!(header = name, ip = candidate, "resolved client ip");
                return candidate.to_string();
            }
        }
    }

    let fallback = peer.map(|p| p.to_string()).unwrap_or_default();
    debug!(ip = %fallback, "no usable proxy header, falling back to peer address");
    fallback
}

/// Best-effort real client IP address.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());

        Ok(ClientIp(client_ip_from_headers(&parts.headers, peer)))
    }
}
