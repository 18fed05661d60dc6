//! DTOs for the create endpoint.

use serde::{Deserialize, Serialize};

use crate::application::services::CreateOutcome;

/// Form body of `POST /create`.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub url: Option<String>,
}

/// JSON answer of `POST /create`.
///
/// Only `success` is always present:
///
/// - success: `{ success, url, result, hostname, times_used }`
/// - rejected: `{ success, url, hostname, result }` with `result` holding the
///   reason
/// - empty input: `{ success }`
#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub times_used: Option<i32>,
}

impl From<CreateOutcome> for CreateResponse {
    fn from(outcome: CreateOutcome) -> Self {
        match outcome {
            CreateOutcome::Empty => Self {
                success: false,
                url: None,
                result: None,
                hostname: None,
                times_used: None,
            },
            CreateOutcome::Rejected {
                url,
                hostname,
                message,
            } => Self {
                success: false,
                url: Some(url),
                result: Some(message),
                hostname: Some(hostname),
                times_used: None,
            },
            CreateOutcome::Created {
                url,
                short_url,
                hostname,
                times_used,
            } => Self {
                success: true,
                url: Some(url),
                result: Some(short_url),
                hostname: Some(hostname),
                times_used: Some(times_used),
            },
        }
    }
}
