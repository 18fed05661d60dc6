//! Handler for short code resolution.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

use crate::application::services::ResolveError;
use crate::error::AppError;
use crate::state::AppState;

/// Shape of a code the router accepts.
static CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());

/// Where unresolvable codes are sent.
pub const INDEX_PATH: &str = "/";

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Responses
///
/// - **301 Moved Permanently** to the stored URL; the usage counter is
///   incremented first
/// - **302 Found** to `/` when the code is too long, contains a character
///   outside the alphabet or maps to no record
/// - **404 Not Found** when the path segment is not alphanumeric
///
/// # Errors
///
/// Returns 500 Internal Server Error on database failures.
pub async fn resolve_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    if !CODE_REGEX.is_match(&code) {
        return Err(AppError::not_found("Page not found", json!({ "path": code })));
    }

    match state.shortener_service.resolve(&code).await {
        Ok(url) => Ok(redirect(StatusCode::MOVED_PERMANENTLY, url)),
        Err(ResolveError::Storage(e)) => Err(e),
        Err(_) => Ok(redirect(StatusCode::FOUND, INDEX_PATH.to_string())),
    }
}

// axum's `Redirect::permanent` answers 308, clients expect a plain 301 here.
fn redirect(status: StatusCode, location: String) -> Response {
    (status, [(header::LOCATION, location)]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_regex() {
        assert!(CODE_REGEX.is_match("abc123"));
        assert!(CODE_REGEX.is_match("ZZZZZZZZZZZZ"));
        assert!(!CODE_REGEX.is_match(""));
        assert!(!CODE_REGEX.is_match("abc-123"));
        assert!(!CODE_REGEX.is_match("caf\u{e9}"));
    }

    #[test]
    fn test_redirect_sets_location() {
        let response = redirect(StatusCode::FOUND, "/".to_string());
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }
}
