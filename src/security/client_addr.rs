//! Client identity resolution.
//!
//! Determines the logical client address used as the rate-limiter key.
//! Behind a trusted reverse proxy the peer address is the proxy itself,
//! so the forwarded chain has to be consulted instead.

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Resolve the client identity for a request.
///
/// With `trust_proxy` disabled the peer address is returned
/// unconditionally. With it enabled, the left-most (client-most) entry of
/// `X-Forwarded-For` wins, then `X-Real-IP`, then the peer address.
/// Malformed headers degrade to the peer address; there is no error path.
pub fn resolve_client_addr(peer: SocketAddr, headers: &HeaderMap, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(ip) = forwarded_client_ip(headers) {
            return ip;
        }
    }
    peer.ip().to_string()
}

fn forwarded_client_ip(headers: &HeaderMap) -> Option<String> {
    // X-Forwarded-For: client, proxy1, proxy2 — the first entry is the
    // original client.
    if let Some(value) = headers.get("x-forwarded-for") {
        if let Ok(chain) = value.to_str() {
            if let Some(first) = chain.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return Some(first.to_string());
                }
            }
        }
    }

    // X-Real-IP as set by nginx.
    if let Some(value) = headers.get("x-real-ip") {
        if let Ok(ip) = value.to_str() {
            let ip = ip.trim();
            if !ip.is_empty() {
                return Some(ip.to_string());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "10.0.0.1:54321".parse().unwrap()
    }

    #[test]
    fn test_peer_address_when_trust_disabled() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("1.2.3.4"));

        assert_eq!(resolve_client_addr(peer(), &headers, false), "10.0.0.1");
    }

    #[test]
    fn test_forwarded_chain_takes_leftmost() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 172.16.0.1, 10.0.0.1"),
        );

        assert_eq!(resolve_client_addr(peer(), &headers, true), "1.2.3.4");
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("5.6.7.8"));

        assert_eq!(resolve_client_addr(peer(), &headers, true), "5.6.7.8");
    }

    #[test]
    fn test_no_headers_falls_back_to_peer() {
        let headers = HeaderMap::new();
        assert_eq!(resolve_client_addr(peer(), &headers, true), "10.0.0.1");
    }

    #[test]
    fn test_empty_forwarded_entry_degrades_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("  , 1.2.3.4"));

        assert_eq!(resolve_client_addr(peer(), &headers, true), "10.0.0.1");
    }

    #[test]
    fn test_non_utf8_header_degrades_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );

        assert_eq!(resolve_client_addr(peer(), &headers, true), "10.0.0.1");
    }
}
