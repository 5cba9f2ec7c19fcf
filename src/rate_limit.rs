//! ADS rate-limit headers.
//!
//! The values are reported as the server sent them. Nothing in the client
//! waits or retries based on them.

use reqwest::header::HeaderMap;
use serde::Serialize;

/// Snapshot of the `X-RateLimit-*` headers from one response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RateLimits {
    /// Requests allowed per window (`X-RateLimit-Limit`).
    pub limit: Option<String>,
    /// Requests left in the current window (`X-RateLimit-Remaining`).
    pub remaining: Option<String>,
    /// Unix time at which the window resets (`X-RateLimit-Reset`).
    pub reset: Option<String>,
}

impl RateLimits {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            limit: read("x-ratelimit-limit"),
            remaining: read("x-ratelimit-remaining"),
            reset: read("x-ratelimit-reset"),
        }
    }
}
