//! Client address extraction
//!
//! First `X-Forwarded-For` entry, then `X-Real-IP`, then the socket peer.
//! Any port suffix is stripped.

use std::net::{IpAddr, SocketAddr};

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};

use crate::error::ApiError;

/// Client IP as recorded on issued tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        resolve_client_ip(&parts.headers, peer)
            .map(ClientIp)
            .ok_or_else(|| ApiError::BadRequest("unable to determine client address".to_string()))
    }
}

/// Resolve the client address from proxy headers or the peer socket
pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    forwarded
        .or(real_ip)
        .map(strip_port)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

/// Drop a `:port` suffix, leaving bare IPv4/IPv6 addresses untouched
pub fn strip_port(raw: &str) -> String {
    if let Ok(addr) = raw.parse::<SocketAddr>() {
        return addr.ip().to_string();
    }
    if let Ok(ip) = raw.parse::<IpAddr>() {
        return ip.to_string();
    }
    let unbracketed = raw.trim_start_matches('[').trim_end_matches(']');
    if unbracketed.parse::<IpAddr>().is_ok() {
        return unbracketed.to_string();
    }
    match raw.rsplit_once(':') {
        Some((host, _port)) if !host.is_empty() && !host.contains(':') => host.to_string(),
        _ => raw.to_string(),
    }
}
