//! URL probe trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Transport-level failures of a probe request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("TLS handshake failed: {0}")]
    Tls(String),

    #[error("Too many redirects")]
    TooManyRedirects,

    #[error("Request timed out")]
    Timeout,

    #[error("No probe slot available")]
    PoolExhausted,

    #[error("Request failed: {0}")]
    Other(String),
}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Capability to check whether a URL answers over the network.
///
/// Injected into [`crate::application::services::UrlValidator`] so tests can
/// substitute canned responses for real network traffic.
///
/// # Implementations
///
/// - [`crate::infrastructure::probe::HttpProbe`] - `reqwest` client with rustls
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlProbe: Send + Sync {
    /// Sends a `HEAD` request and returns the final status code.
    ///
    /// Redirects are followed up to the implementation's limit; the whole
    /// exchange is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProbeError`] when no HTTP status could be obtained.
    async fn head(&self, url: &str, timeout: Duration) -> ProbeResult<u16>;
}
