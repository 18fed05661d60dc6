mod common;

use axum::{Router, http::StatusCode, routing::get};
use axum_test::TestServer;
use sqlx::PgPool;
use url_redirector::api::handlers::resolve_handler;
use url_redirector::utils::base_n::Alphabet;

fn server(pool: PgPool) -> TestServer {
    let state = common::create_test_state(pool);
    let app = Router::new()
        .route("/{code}", get(resolve_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[sqlx::test]
async fn test_resolve_success(pool: PgPool) {
    common::insert_redirect(&pool, 123_456, "https://example.com/target").await;
    let code = Alphabet::default().encode_id(123_456).unwrap();

    let server = server(pool.clone());
    let response = server.get(&format!("/{}", code)).await;

    response.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.header("location"), "https://example.com/target");
    assert_eq!(common::times_used(&pool, 123_456).await, 1);
}

#[sqlx::test]
async fn test_resolve_counts_every_use(pool: PgPool) {
    common::insert_redirect(&pool, 0, "https://example.com/").await;
    let server = server(pool.clone());

    for _ in 0..5 {
        server
            .get("/2")
            .await
            .assert_status(StatusCode::MOVED_PERMANENTLY);
    }

    assert_eq!(common::times_used(&pool, 0).await, 5);
}

#[sqlx::test]
async fn test_resolve_unknown_code_redirects_to_index(pool: PgPool) {
    let server = server(pool);

    let response = server.get("/abc").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "/");
}

#[sqlx::test]
async fn test_resolve_invalid_character_redirects_to_index(pool: PgPool) {
    let server = server(pool);

    // '0' is not part of the default alphabet.
    let response = server.get("/a0b").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "/");
}

#[sqlx::test]
async fn test_resolve_too_long_code_redirects_to_index(pool: PgPool) {
    common::insert_redirect(&pool, 0, "https://example.com/").await;
    let server = server(pool.clone());

    let response = server.get("/22222222222").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "/");
    assert_eq!(common::times_used(&pool, 0).await, 0);
}

#[sqlx::test]
async fn test_resolve_non_alphanumeric_path_is_not_found(pool: PgPool) {
    let server = server(pool);

    let response = server.get("/abc-def").await;

    response.assert_status_not_found();
}
