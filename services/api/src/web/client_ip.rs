//! services/api/src/web/client_ip.rs
//!
//! Derives the client address used throughout the access ledger. Behind a
//! trusted reverse proxy the first value of the forwarded-for chain is the
//! real client; otherwise the socket peer address is.

use axum::http::HeaderMap;
use std::net::SocketAddr;

const PROXY_HEADERS: [&str; 2] = ["x-forwarded-for", "x-real-ip"];

/// Resolves the client IP for a request.
///
/// `behind_proxy` must only be enabled when a proxy the deployment controls
/// sets these headers; otherwise they are client-spoofable and ignored.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        for header in PROXY_HEADERS {
            if let Some(value) = headers.get(header).and_then(|v| v.to_str().ok()) {
                // The first value in the chain is the originating client.
                if let Some(ip) = value.split(',').next().map(str::trim) {
                    if !ip.is_empty() {
                        return ip.to_string();
                    }
                }
            }
        }
    }
    peer.ip().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "10.0.0.9:55555".parse().unwrap()
    }

    #[test]
    fn direct_connection_uses_peer_address() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, peer(), false), "10.0.0.9");
        assert_eq!(client_ip(&headers, peer(), true), "10.0.0.9");
    }

    #[test]
    fn forwarded_for_chain_takes_first_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 172.16.0.1"),
        );
        assert_eq!(client_ip(&headers, peer(), true), "1.2.3.4");
    }

    #[test]
    fn real_ip_is_the_fallback_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("5.6.7.8"));
        assert_eq!(client_ip(&headers, peer(), true), "5.6.7.8");
    }

    #[test]
    fn headers_are_ignored_when_not_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("1.2.3.4"));
        assert_eq!(client_ip(&headers, peer(), false), "10.0.0.9");
    }

    #[test]
    fn empty_forwarded_value_falls_through() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(" "));
        headers.insert("x-real-ip", HeaderValue::from_static("5.6.7.8"));
        assert_eq!(client_ip(&headers, peer(), true), "5.6.7.8");
    }
}
