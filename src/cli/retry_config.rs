//! Retry configuration for asset uploads.
//!
//! Defaults match the documented behavior (4 attempts, 4 s delay cap);
//! environment variables can tune them for slow or flaky networks.

use crate::release::RetryPolicy;
use std::time::Duration;

/// Default number of upload attempts per file
pub const DEFAULT_UPLOAD_ATTEMPTS: u32 = 4;

/// Default cap on the delay between two attempts
pub const DEFAULT_MAX_DELAY_MS: u64 = 4000;

/// Configuration for upload retry behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Attempts per file, first try included
    pub upload_attempts: u32,

    /// Upper bound of a single backoff sleep, in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            upload_attempts: DEFAULT_UPLOAD_ATTEMPTS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

impl RetryConfig {
    /// Parse a number from an environment variable, clamped to `[min, max]`
    fn parse_env(var_name: &str, default: u64, min: u64, max: u64) -> u64 {
        std::env::var(var_name)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(|v| v.clamp(min, max))
            .unwrap_or(default)
    }

    /// Create config from environment variables with fallback to defaults
    pub fn from_env() -> Self {
        let attempts = Self::parse_env(
            "RELEASE_TAGGER_UPLOAD_ATTEMPTS",
            u64::from(DEFAULT_UPLOAD_ATTEMPTS),
            1,
            10,
        );
        Self {
            upload_attempts: u32::try_from(attempts).unwrap_or(DEFAULT_UPLOAD_ATTEMPTS),
            max_delay_ms: Self::parse_env("RELEASE_TAGGER_MAX_DELAY_MS", DEFAULT_MAX_DELAY_MS, 0, 60_000),
        }
    }

    /// Backoff policy for the upload loop
    pub fn upload_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.upload_attempts, Duration::from_millis(self.max_delay_ms))
    }
}
