//! Tunables of the HTTP client.

use super::retry_policy::RetryPolicy;
use std::time::Duration;

/// Client-side request rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Settings shared by every request made through one client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Age after which the session ticket is renewed before the next call.
    pub ticket_lifetime: Duration,
    /// Total timeout of one HTTP round-trip.
    pub request_timeout: Duration,
    /// Retry policy applied to transport failures.
    pub retry: RetryPolicy,
    /// Optional client-side rate limit; `None` disables it.
    pub rate_limit: Option<RateLimitConfig>,
    /// Refuse well-known superuser names such as `root`.
    pub block_reserved_usernames: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            // Proxmox tickets are valid for two hours.
            ticket_lifetime: Duration::from_secs(2 * 60 * 60),
            request_timeout: Duration::from_secs(15),
            retry: RetryPolicy::default(),
            rate_limit: None,
            block_reserved_usernames: false,
        }
    }
}
