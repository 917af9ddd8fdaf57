//! Client address extraction.
//!
//! Attempts are recorded with the address of the client that submitted
//! them. Behind a reverse proxy the peer address is the proxy's, so the
//! first hop of `X-Forwarded-For` is preferred when the server is
//! configured to trust it.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;

use super::AppState;

/// Header carrying the proxy chain, client first.
const FORWARDED_FOR: &str = "x-forwarded-for";

/// Recorded when neither a forwarded nor a peer address is known.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// The address of the client making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(Self(resolve_client_ip(
            &parts.headers,
            peer,
            state.trust_forwarded_for(),
        )))
    }
}

/// Pick the client address from the forwarded header or the peer socket.
pub fn resolve_client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get(FORWARDED_FOR)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|first| !first.is_empty());

        if let Some(first) = forwarded {
            return first.to_string();
        }
    }

    peer.map_or_else(|| UNKNOWN_CLIENT.to_string(), |addr| addr.ip().to_string())
}
