//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::{RedirectService, ShortenerService};
use crate::infrastructure::persistence::PgRedirectRepository;

#[derive(Clone)]
pub struct AppState {
    pub redirect_service: Arc<RedirectService<PgRedirectRepository>>,
    pub shortener_service: Arc<ShortenerService<PgRedirectRepository>>,
}
