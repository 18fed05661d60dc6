//! Create and resolve flows behind the HTTP handlers.
//!
//! # Create
//!
//! 1. Empty input ends the flow with [`CreateOutcome::Empty`]
//! 2. The URL is canonicalized and a display hostname derived from it
//! 3. The canonical URL is validated (scheme, then a live probe)
//! 4. On success the record is fetched or created and its id encoded
//!
//! # Resolve
//!
//! Codes longer than [`MAX_DECODE_LENGTH`] are refused without decoding since
//! they cannot map to a stored id. Otherwise the code is decoded, the usage
//! counter incremented and the stored URL returned.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::application::services::redirect_service::RedirectService;
use crate::application::services::url_validator::{UrlValidator, ValidationError};
use crate::domain::repositories::RedirectRepository;
use crate::error::AppError;
use crate::utils::base_n::{Alphabet, CodecError};
use crate::utils::url_normalizer::{canonicalize, hostname};

/// Longest code worth decoding: 10 symbols already exceed the id range.
pub const MAX_DECODE_LENGTH: usize = 10;

/// Result of a create request that did not hit an internal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// No URL was submitted.
    Empty,
    /// The URL failed validation.
    Rejected {
        url: String,
        hostname: String,
        message: String,
    },
    /// The URL has a short link.
    Created {
        url: String,
        short_url: String,
        hostname: String,
        times_used: i32,
    },
}

/// Why a short code could not be resolved.
///
/// Every variant except [`ResolveError::Storage`] is a soft failure: the
/// client is sent back to the index page without further detail.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("code is longer than {} characters", MAX_DECODE_LENGTH)]
    TooLong,

    #[error(transparent)]
    Decode(#[from] CodecError),

    #[error("no redirect stored for this code")]
    NotFound,

    #[error(transparent)]
    Storage(AppError),
}

impl ResolveError {
    /// Returns `true` for failures that redirect to the index.
    pub fn is_soft(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Orchestrates normalization, validation, storage and encoding.
pub struct ShortenerService<R: RedirectRepository> {
    redirects: Arc<RedirectService<R>>,
    validator: UrlValidator,
    alphabet: Alphabet,
    base_url: String,
}

impl<R: RedirectRepository> ShortenerService<R> {
    pub fn new(
        redirects: Arc<RedirectService<R>>,
        validator: UrlValidator,
        alphabet: Alphabet,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            redirects,
            validator,
            alphabet,
            base_url: base_url.into(),
        }
    }

    /// Creates (or reuses) a short link for a submitted URL.
    ///
    /// Blank input counts as no input.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors or if the stored id
    /// cannot be encoded. Validation failures are not errors, they are
    /// reported as [`CreateOutcome::Rejected`].
    pub async fn create(&self, raw: Option<&str>) -> Result<CreateOutcome, AppError> {
        let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
            return Ok(CreateOutcome::Empty);
        };

        let url = canonicalize(raw);
        let host = match hostname(&url) {
            name if name.is_empty() => url.clone(),
            name => name,
        };

        if let Err(e) = self.validator.validate(&url).await {
            info!(category = e.category(), "Rejected {}: {}", url, e);
            return Ok(rejected(url, host, &e));
        }

        let record = self.redirects.get_or_create(&url).await?;
        let code = self.encode(record.id)?;

        Ok(CreateOutcome::Created {
            short_url: self.short_url(&code),
            url,
            hostname: host,
            times_used: record.times_used,
        })
    }

    /// Resolves a short code to its destination and counts the use.
    ///
    /// # Errors
    ///
    /// See [`ResolveError`]. Soft failures are logged at debug level.
    pub async fn resolve(&self, code: &str) -> Result<String, ResolveError> {
        let result = self.try_resolve(code).await;

        if let Err(e) = &result
            && e.is_soft()
        {
            debug!("Could not resolve {:?}: {}", code, e);
        }

        result
    }

    async fn try_resolve(&self, code: &str) -> Result<String, ResolveError> {
        if code.chars().count() > MAX_DECODE_LENGTH {
            return Err(ResolveError::TooLong);
        }

        let id = self
            .alphabet
            .decode_id(code)?
            .ok_or(ResolveError::NotFound)?;

        let record = self
            .redirects
            .increment_usage(id)
            .await
            .map_err(ResolveError::Storage)?
            .ok_or(ResolveError::NotFound)?;

        Ok(record.original_url)
    }

    /// Encodes a record id as a short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] for a negative id.
    pub fn encode(&self, id: i32) -> Result<String, AppError> {
        self.alphabet.encode_id(id).map_err(|e| {
            AppError::internal(
                "Failed to encode redirect id",
                json!({ "id": id, "reason": e.to_string() }),
            )
        })
    }

    /// Builds the absolute short link for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }
}

fn rejected(url: String, hostname: String, error: &ValidationError) -> CreateOutcome {
    CreateOutcome::Rejected {
        url,
        hostname,
        message: error.to_string(),
    }
}
