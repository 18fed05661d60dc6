//! Scheme and reachability validation for submitted URLs.

use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::probe::{ProbeError, UrlProbe};

/// Schemes accepted when none are configured.
pub const DEFAULT_ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Default bound on a single probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Why a URL was rejected.
///
/// The `Display` output is the message shown to the person who submitted the
/// URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("The scheme must be {}", .allowed.join(" or "))]
    Scheme { allowed: Vec<String> },

    #[error("We could not establish a connection to that site")]
    Connection,

    #[error("There was a problem with the site's SSL certificate")]
    Tls,

    #[error("The maximum number of retries was exceeded while trying to connect")]
    MaxRetries,

    #[error("Please try again later")]
    PoolExhausted,

    #[error("The site took too long to respond")]
    Timeout,

    #[error("The webpage could not be found")]
    NotFound,

    #[error("The site returned the error code \"{0}\"")]
    Status(u16),

    #[error("A problem occurred, please try a different url")]
    Other,
}

impl ValidationError {
    /// Coarse category used in logs: `scheme`, `network` or `http_status`.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Scheme { .. } => "scheme",
            Self::NotFound | Self::Status(_) => "http_status",
            _ => "network",
        }
    }
}

impl From<ProbeError> for ValidationError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::Connect(_) => Self::Connection,
            ProbeError::Tls(_) => Self::Tls,
            ProbeError::TooManyRedirects => Self::MaxRetries,
            ProbeError::PoolExhausted => Self::PoolExhausted,
            ProbeError::Timeout => Self::Timeout,
            ProbeError::Other(_) => Self::Other,
        }
    }
}

/// Checks that a canonical URL uses an allowed scheme and answers `200 OK`.
///
/// Validation never retries: a failed probe is reported once.
pub struct UrlValidator {
    probe: Arc<dyn UrlProbe>,
    allowed_schemes: Vec<String>,
    timeout: Duration,
}

impl UrlValidator {
    /// Creates a validator around an injected probe.
    pub fn new(probe: Arc<dyn UrlProbe>, allowed_schemes: Vec<String>, timeout: Duration) -> Self {
        Self {
            probe,
            allowed_schemes,
            timeout,
        }
    }

    /// Creates a validator accepting `http` and `https` with a 2 second timeout.
    pub fn with_defaults(probe: Arc<dyn UrlProbe>) -> Self {
        Self::new(
            probe,
            DEFAULT_ALLOWED_SCHEMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            DEFAULT_PROBE_TIMEOUT,
        )
    }

    /// Checks only the scheme (the text before `://`).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Scheme`] if the separator is missing or the
    /// scheme is not allowed.
    pub fn check_scheme(&self, url: &str) -> Result<(), ValidationError> {
        let allowed = url
            .find("://")
            .map(|idx| &url[..idx])
            .is_some_and(|scheme| self.allowed_schemes.iter().any(|s| s == scheme));

        if allowed {
            Ok(())
        } else {
            Err(ValidationError::Scheme {
                allowed: self.allowed_schemes.clone(),
            })
        }
    }

    /// Validates the scheme, then probes the URL.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered; `404` and other
    /// non-`200` statuses are reported separately.
    pub async fn validate(&self, url: &str) -> Result<(), ValidationError> {
        self.check_scheme(url)?;

        let status = self.probe.head(url, self.timeout).await.map_err(|e| {
            tracing::debug!("Probe of {} failed: {}", url, e);
            ValidationError::from(e)
        })?;

        match status {
            200 => Ok(()),
            404 => Err(ValidationError::NotFound),
            other => Err(ValidationError::Status(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::probe::MockUrlProbe;

    fn validator_with(status: Result<u16, ProbeError>) -> UrlValidator {
        let mut probe = MockUrlProbe::new();
        probe
            .expect_head()
            .returning(move |_, _| status.clone());
        UrlValidator::with_defaults(Arc::new(probe))
    }

    fn validator_without_probe() -> UrlValidator {
        let mut probe = MockUrlProbe::new();
        probe.expect_head().times(0);
        UrlValidator::with_defaults(Arc::new(probe))
    }

    #[tokio::test]
    async fn test_validate_ok() {
        let validator = validator_with(Ok(200));
        assert_eq!(validator.validate("http://www.example.com/").await, Ok(()));
    }

    #[tokio::test]
    async fn test_validate_passes_timeout_to_probe() {
        let mut probe = MockUrlProbe::new();
        probe
            .expect_head()
            .withf(|url, timeout| {
                url == "https://example.com/" && *timeout == Duration::from_millis(750)
            })
            .times(1)
            .returning(|_, _| Ok(200));

        let validator = UrlValidator::new(
            Arc::new(probe),
            vec!["https".to_string()],
            Duration::from_millis(750),
        );

        assert!(validator.validate("https://example.com/").await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_disallowed_scheme() {
        let validator = validator_without_probe();
        let err = validator
            .validate("ftp://www.example.com/")
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationError::Scheme { .. }));
        assert_eq!(err.to_string(), "The scheme must be http or https");
    }

    #[tokio::test]
    async fn test_validate_missing_scheme() {
        let validator = validator_without_probe();
        assert!(matches!(
            validator.validate("www.example.com").await,
            Err(ValidationError::Scheme { .. })
        ));
        assert!(matches!(
            validator.validate("://www.example.com").await,
            Err(ValidationError::Scheme { .. })
        ));
    }

    #[tokio::test]
    async fn test_validate_not_found() {
        let validator = validator_with(Ok(404));
        let err = validator
            .validate("http://www.example.com/404")
            .await
            .unwrap_err();
        assert_eq!(err, ValidationError::NotFound);
        assert_eq!(err.to_string(), "The webpage could not be found");
    }

    #[tokio::test]
    async fn test_validate_other_status() {
        let validator = validator_with(Ok(503));
        let err = validator
            .validate("http://www.example.com/")
            .await
            .unwrap_err();
        assert_eq!(err, ValidationError::Status(503));
        assert_eq!(err.to_string(), "The site returned the error code \"503\"");
        assert_eq!(err.category(), "http_status");
    }

    #[tokio::test]
    async fn test_validate_network_failures() {
        let cases = [
            (
                ProbeError::Connect("refused".to_string()),
                ValidationError::Connection,
            ),
            (
                ProbeError::Tls("bad certificate".to_string()),
                ValidationError::Tls,
            ),
            (ProbeError::TooManyRedirects, ValidationError::MaxRetries),
            (ProbeError::PoolExhausted, ValidationError::PoolExhausted),
            (ProbeError::Timeout, ValidationError::Timeout),
            (
                ProbeError::Other("builder".to_string()),
                ValidationError::Other,
            ),
        ];

        for (probe_error, expected) in cases {
            let validator = validator_with(Err(probe_error));
            let err = validator
                .validate("https://www.example.com/")
                .await
                .unwrap_err();
            assert_eq!(err, expected);
            assert_eq!(err.category(), "network");
        }
    }

    #[test]
    fn test_check_scheme_is_case_sensitive() {
        let validator = validator_without_probe();
        assert!(validator.check_scheme("https://example.com/").is_ok());
        assert!(validator.check_scheme("HTTPS://example.com/").is_err());
    }
}
