//! Outbound reachability probing for submitted URLs.
//!
//! Provides a [`UrlProbe`] trait with the production [`HttpProbe`]
//! implementation.

mod http_probe;
mod service;

pub use http_probe::HttpProbe;
pub use service::{ProbeError, ProbeResult, UrlProbe};

#[cfg(test)]
pub use service::MockUrlProbe;
