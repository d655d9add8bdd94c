//! HTTP client creation and configuration utilities

use reqwest::Client;
use std::time::Duration;

/// Creates a properly configured HTTP client with connection pooling and
/// timeout handling. One client is shared across all league fetches so the
/// pool and HTTP/2 multiplexing are actually used.
pub fn create_http_client_with_timeout(timeout_seconds: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(crate::constants::HTTP_POOL_MAX_IDLE_PER_HOST)
        .build()
}

/// Creates an HTTP client for testing with the default timeout
#[cfg(test)]
pub fn create_test_http_client() -> Client {
    create_http_client_with_timeout(crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS)
        .expect("Failed to create test HTTP client")
}
