//! Client address extraction for rate limiting.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Marker for a request whose address could not be determined.
pub const UNKNOWN_IP: &str = "unknown";

/// The client address as reported by the reverse proxy.
///
/// `x-real-ip` is used first and overridden by the first entry of
/// `x-forwarded-for` when present. Falls back to [`UNKNOWN_IP`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let forwarded = header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let ip = forwarded.or_else(|| header("x-real-ip")).unwrap_or(UNKNOWN_IP);
        Self(ip.to_string())
    }

    pub fn is_known(&self) -> bool {
        self.0 != UNKNOWN_IP
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn forwarded_for_overrides_real_ip() {
        let ip = ClientIp::from_headers(&headers(&[
            ("x-real-ip", "10.0.0.1"),
            ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
        ]));
        assert_eq!(ip, ClientIp("203.0.113.7".into()));
    }

    #[test]
    fn real_ip_used_alone() {
        let ip = ClientIp::from_headers(&headers(&[("x-real-ip", "198.51.100.2")]));
        assert_eq!(ip.0, "198.51.100.2");
    }

    #[test]
    fn no_headers_is_unknown() {
        let ip = ClientIp::from_headers(&HeaderMap::new());
        assert!(!ip.is_known());
    }
}
