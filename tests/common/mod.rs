#![allow(dead_code)]

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use url_redirector::application::services::{RedirectService, ShortenerService, UrlValidator};
use url_redirector::infrastructure::persistence::PgRedirectRepository;
use url_redirector::infrastructure::probe::{ProbeError, ProbeResult, UrlProbe};
use url_redirector::state::AppState;
use url_redirector::utils::base_n::Alphabet;

pub const BASE_URL: &str = "http://short.test/";

/// Probe that never leaves the process.
///
/// URLs containing `404` answer 404, URLs containing `unreachable` fail to
/// connect, everything else answers 200.
pub struct StubProbe;

#[async_trait]
impl UrlProbe for StubProbe {
    async fn head(&self, url: &str, _timeout: Duration) -> ProbeResult<u16> {
        if url.contains("unreachable") {
            Err(ProbeError::Connect("connection refused".to_string()))
        } else if url.contains("404") {
            Ok(404)
        } else {
            Ok(200)
        }
    }
}

pub fn redirect_service(pool: PgPool) -> RedirectService<PgRedirectRepository> {
    RedirectService::new(Arc::new(PgRedirectRepository::new(Arc::new(pool))))
}

pub fn create_test_state(pool: PgPool) -> AppState {
    let redirect_service = Arc::new(redirect_service(pool));

    let shortener_service = Arc::new(ShortenerService::new(
        redirect_service.clone(),
        UrlValidator::with_defaults(Arc::new(StubProbe)),
        Alphabet::default(),
        BASE_URL,
    ));

    AppState {
        redirect_service,
        shortener_service,
    }
}

pub async fn insert_redirect(pool: &PgPool, id: i32, url: &str) {
    sqlx::query("INSERT INTO redirects (id, original_url) VALUES ($1, $2)")
        .bind(id)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn times_used(pool: &PgPool, id: i32) -> i32 {
    sqlx::query_scalar("SELECT times_used FROM redirects WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn redirect_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM redirects")
        .fetch_one(pool)
        .await
        .unwrap()
}
