//! Index page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

/// Template for the index page.
///
/// Renders `templates/index.html`: a single form whose script posts to
/// `/create` and shows the JSON answer.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub create_path: &'static str,
}

/// Renders the index page.
///
/// # Endpoint
///
/// `GET /`
///
/// Also the destination of every failed resolve.
pub async fn index_handler() -> impl IntoResponse {
    IndexTemplate {
        create_path: "/create",
    }
}
