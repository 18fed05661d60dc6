mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use sqlx::PgPool;
use tower::ServiceExt;
use url_redirector::routes::app_router;

#[sqlx::test]
async fn test_index_page(pool: PgPool) {
    let app = app_router(common::create_test_state(pool));

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains(r#"action="/create""#));
}

#[sqlx::test]
async fn test_resolve_with_trailing_slash(pool: PgPool) {
    common::insert_redirect(&pool, 0, "https://example.com/").await;
    let app = app_router(common::create_test_state(pool.clone()));

    let response = app
        .oneshot(Request::get("/2/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers()[header::LOCATION], "https://example.com/");
    assert_eq!(common::times_used(&pool, 0).await, 1);
}

#[sqlx::test]
async fn test_create_with_trailing_slash(pool: PgPool) {
    let app = app_router(common::create_test_state(pool.clone()));

    let request = Request::post("/create/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("url=example.com%2Fpage"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["url"], "http://example.com/page");
    assert_eq!(common::redirect_count(&pool).await, 1);
}

#[sqlx::test]
async fn test_health_is_not_treated_as_code(pool: PgPool) {
    let app = app_router(common::create_test_state(pool));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
