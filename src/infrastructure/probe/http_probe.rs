//! `reqwest`-backed URL probe.

use super::service::{ProbeError, ProbeResult, UrlProbe};
use async_trait::async_trait;
use reqwest::{Client, redirect::Policy};
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Probe that issues real `HEAD` requests.
///
/// Server certificates are verified against the webpki root bundle. The
/// number of in-flight probes is capped by a semaphore; a probe that finds no
/// free slot fails immediately with [`ProbeError::PoolExhausted`] instead of
/// queueing behind other requests.
pub struct HttpProbe {
    client: Client,
    slots: Arc<Semaphore>,
}

impl HttpProbe {
    /// Builds the shared HTTP client.
    ///
    /// # Arguments
    ///
    /// - `max_redirects` - redirect hops followed before giving up
    /// - `max_concurrency` - probes allowed in flight at once
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Other`] if the TLS backend cannot be initialized.
    pub fn new(max_redirects: usize, max_concurrency: usize) -> ProbeResult<Self> {
        let client = Client::builder()
            .use_rustls_tls()
            .https_only(false)
            .redirect(Policy::limited(max_redirects))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| ProbeError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            slots: Arc::new(Semaphore::new(max_concurrency)),
        })
    }
}

#[async_trait]
impl UrlProbe for HttpProbe {
    async fn head(&self, url: &str, timeout: Duration) -> ProbeResult<u16> {
        let _slot = self.slots.try_acquire().map_err(|_| {
            warn!("All probe slots are busy, rejecting probe of {}", url);
            ProbeError::PoolExhausted
        })?;

        let response = self
            .client
            .head(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status().as_u16();
        debug!("Probe of {} answered {}", url, status);

        Ok(status)
    }
}

/// Maps a `reqwest` failure onto the probe taxonomy.
fn classify(err: reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout
    } else if err.is_redirect() {
        ProbeError::TooManyRedirects
    } else if is_tls_failure(&err) {
        ProbeError::Tls(err.to_string())
    } else if err.is_connect() {
        ProbeError::Connect(err.to_string())
    } else {
        ProbeError::Other(err.to_string())
    }
}

/// Walks the source chain looking for a rustls error.
///
/// hyper and tokio-rustls nest TLS failures in one or more `io::Error`
/// layers, and `io::Error::source()` skips the wrapped value, so every
/// `io::Error::get_ref` is searched as well.
fn is_tls_failure(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);

    while let Some(e) = current {
        if e.is::<rustls::Error>() {
            return true;
        }
        if let Some(io) = e.downcast_ref::<std::io::Error>()
            && let Some(inner) = io.get_ref()
            && is_tls_failure(inner)
        {
            return true;
        }
        current = e.source();
    }

    false
}
