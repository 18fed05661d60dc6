mod common;

use axum::{Router, routing::post};
use axum_test::TestServer;
use serde_json::json;
use sqlx::PgPool;
use url_redirector::api::handlers::create_handler;

fn server(pool: PgPool) -> TestServer {
    let state = common::create_test_state(pool);
    let app = Router::new()
        .route("/create", post(create_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[sqlx::test]
async fn test_create_success(pool: PgPool) {
    let server = server(pool.clone());

    let response = server
        .post("/create")
        .form(&[("url", "http://www.example.com/")])
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["success"], true);
    assert_eq!(json["url"], "http://www.example.com/");
    assert_eq!(json["hostname"], "Example");
    assert_eq!(json["times_used"], 0);

    let short_url = json["result"].as_str().unwrap();
    assert!(short_url.starts_with(common::BASE_URL));
    assert_eq!(common::redirect_count(&pool).await, 1);
}

#[sqlx::test]
async fn test_create_empty_input(pool: PgPool) {
    let server = server(pool.clone());

    let response = server.post("/create").form(&[("url", "")]).await;

    response.assert_status_ok();
    response.assert_json(&json!({ "success": false }));

    let response = server
        .post("/create")
        .form(&Vec::<(String, String)>::new())
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "success": false }));
    assert_eq!(common::redirect_count(&pool).await, 0);
}

#[sqlx::test]
async fn test_create_rejects_disallowed_scheme(pool: PgPool) {
    let server = server(pool.clone());

    let response = server
        .post("/create")
        .form(&[("url", "ftp://www.example.com/")])
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "success": false,
        "url": "ftp://www.example.com/",
        "hostname": "Example",
        "result": "The scheme must be http or https",
    }));
    assert_eq!(common::redirect_count(&pool).await, 0);
}

#[sqlx::test]
async fn test_create_rejects_missing_page(pool: PgPool) {
    let server = server(pool.clone());

    let response = server
        .post("/create")
        .form(&[("url", "http://www.example.com/404")])
        .await;

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["success"], false);
    assert_eq!(json["result"], "The webpage could not be found");
    assert!(json.get("times_used").is_none());
    assert_eq!(common::redirect_count(&pool).await, 0);
}

#[sqlx::test]
async fn test_create_rejects_unreachable_site(pool: PgPool) {
    let server = server(pool);

    let response = server
        .post("/create")
        .form(&[("url", "unreachable.example.com")])
        .await;

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["success"], false);
    assert_eq!(json["url"], "http://unreachable.example.com/");
    assert_eq!(
        json["result"],
        "We could not establish a connection to that site"
    );
}

#[sqlx::test]
async fn test_equivalent_urls_share_one_link(pool: PgPool) {
    let server = server(pool.clone());

    let first = server
        .post("/create")
        .form(&[("url", "HTTP://www.Example.com/?b=2&a=1")])
        .await
        .json::<serde_json::Value>();

    let second = server
        .post("/create")
        .form(&[("url", "  www.example.com/?a=1&b=2&c=  ")])
        .await
        .json::<serde_json::Value>();

    assert_eq!(first["success"], true);
    assert_eq!(first["url"], "http://www.example.com/?a=1&b=2");
    assert_eq!(first["result"], second["result"]);
    assert_eq!(common::redirect_count(&pool).await, 1);
}

#[sqlx::test]
async fn test_create_reports_usage_count(pool: PgPool) {
    common::insert_redirect(&pool, 0, "http://www.example.com/").await;
    sqlx::query("UPDATE redirects SET times_used = 9 WHERE id = 0")
        .execute(&pool)
        .await
        .unwrap();

    let server = server(pool);

    let json = server
        .post("/create")
        .form(&[("url", "http://www.example.com/")])
        .await
        .json::<serde_json::Value>();

    assert_eq!(json["result"], format!("{}2", common::BASE_URL));
    assert_eq!(json["times_used"], 9);
}
