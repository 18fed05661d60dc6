//! Handler for short link creation.

use axum::{Form, Json, extract::State};

use crate::api::dto::create::{CreateRequest, CreateResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates (or reuses) the short link for a submitted URL.
///
/// # Endpoint
///
/// `POST /create` with a form field `url`
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "url": "http://www.example.com/",
///   "result": "http://localhost:3000/5kD2",
///   "hostname": "Example",
///   "times_used": 0
/// }
/// ```
///
/// A URL that fails validation answers `200 OK` with `success: false` and the
/// reason in `result`. A missing or blank `url` answers `{"success": false}`.
///
/// # Errors
///
/// Returns 500 Internal Server Error on database failures.
pub async fn create_handler(
    State(state): State<AppState>,
    Form(payload): Form<CreateRequest>,
) -> Result<Json<CreateResponse>, AppError> {
    let outcome = state
        .shortener_service
        .create(payload.url.as_deref())
        .await?;

    Ok(Json(outcome.into()))
}
