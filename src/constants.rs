//! Application-wide constants and configuration values
//!
//! This module centralizes magic numbers and tunables so they live in one
//! place instead of being scattered through the engine.

#![allow(dead_code)]

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 100;

/// Sentinel returned by time parsing when a kickoff time cannot be compared
pub const INVALID_MINUTES: i32 = -1;

/// Crest URI used when a team cannot be resolved to any known club
pub const PLACEHOLDER_CREST: &str = "crest/placeholder.png";

/// Live score polling configuration
pub mod polling {
    /// Interval between score fetch cycles (seconds)
    pub const INTERVAL_SECONDS: u64 = 30;

    /// Timeout for the connectivity probe before each cycle (seconds)
    pub const PROBE_TIMEOUT_SECONDS: u64 = 5;
}

/// Sequential insertion fallback bounds
pub mod insertion {
    /// Step interval while waiting for a staged add to become visible (ms)
    pub const WAIT_STEP_MS: u64 = 50;

    /// Hard per-candidate timeout for a staged add (ms)
    pub const WAIT_MAX_MS: u64 = 2000;
}

/// Crest/logo asset cache sizing
pub mod asset_cache {
    /// Maximum number of cached crest URIs
    pub const CAPACITY: usize = 500;
}

/// Retry configuration for provider requests
pub mod retry {
    /// Maximum number of retry attempts for API calls
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 250;
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for provider API domain override
    pub const API_DOMAIN: &str = "MATCHSYNC_API_DOMAIN";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "MATCHSYNC_LOG_FILE";

    /// Environment variable for HTTP timeout override in seconds
    pub const HTTP_TIMEOUT: &str = "MATCHSYNC_HTTP_TIMEOUT";
}
