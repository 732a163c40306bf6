//! Shared HTTP client construction for consistent timeout and TLS configuration.

use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Create an HTTP client with the given request timeout.
///
/// Config: 30s connect timeout (capped by `timeout`), rustls TLS,
/// `precis/{version}` user-agent, redirect limit 10.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn client_with_timeout(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(timeout.min(Duration::from_secs(30)))
        .timeout(timeout)
        .user_agent(concat!("precis/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn default_client() -> Result<reqwest::Client, reqwest::Error> {
    client_with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}
