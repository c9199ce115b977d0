//! Token lifetime policy

use std::time::Duration as StdDuration;

use chrono::Duration;

/// Lifetimes and the per-call storage bound used by issuer and rotator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    /// Validity window of a signed access token
    pub access_token_ttl: Duration,
    /// Fixed lifetime of a refresh record, set at creation
    pub refresh_token_ttl: Duration,
    /// Deadline for a single token store round-trip
    pub store_timeout: StdDuration,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            access_token_ttl: Duration::minutes(15),
            refresh_token_ttl: Duration::days(7),
            store_timeout: StdDuration::from_secs(3),
        }
    }
}
