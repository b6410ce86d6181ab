//! Caller identity (cookie) and client address resolution
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, HeaderValue};
use dropstat_core::{DropError, UserDirectory};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

pub const USER_ID_COOKIE: &str = "userID";

/// Attaches identities to requests. The core only ever sees the resolved id.
pub trait IdentityResolver: Send + Sync {
    fn read_identity(&self, headers: &HeaderMap) -> Option<String>;

    /// Register a new identity for a caller that has none
    fn create_identity(&self, ip: &str) -> Result<String, DropError>;

    /// Response header that hands `user_id` back to the client
    fn identity_header(&self, user_id: &str) -> Option<(header::HeaderName, HeaderValue)>;
}

pub struct CookieIdentity {
    users: Arc<dyn UserDirectory>,
    max_age_secs: i64,
}

impl CookieIdentity {
    pub fn new(users: Arc<dyn UserDirectory>, max_age_days: i64) -> Self {
        Self {
            users,
            max_age_secs: max_age_days.saturating_mul(24 * 60 * 60),
        }
    }
}

impl IdentityResolver for CookieIdentity {
    fn read_identity(&self, headers: &HeaderMap) -> Option<String> {
        read_cookie(headers, USER_ID_COOKIE)
    }

    fn create_identity(&self, ip: &str) -> Result<String, DropError> {
        self.users.create_user(ip)
    }

    fn identity_header(&self, user_id: &str) -> Option<(header::HeaderName, HeaderValue)> {
        if !is_cookie_value(user_id) {
            tracing::error!(uid = user_id, "user id cannot be carried in a cookie");
            return None;
        }
        let cookie = format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            USER_ID_COOKIE, user_id, self.max_age_secs
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => Some((header::SET_COOKIE, value)),
            Err(_) => {
                tracing::error!(uid = user_id, "cannot encode identity cookie");
                None
            }
        }
    }
}

/// RFC 6265 `cookie-octet`: printable ASCII minus space, `"`, `,`, `;` and `\`
pub fn is_cookie_value(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E))
}

pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// First hop of `X-Forwarded-For`, then `X-Real-IP`, then the peer address
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    let real = headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    forwarded
        .or(real)
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Extractor for the caller's address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(ClientIp(client_ip(&parts.headers, peer)))
    }
}
