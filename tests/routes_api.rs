#![cfg(feature = "inmem-store")]

use std::sync::Arc;

use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};

use adsdesk::kv::inmem::InMemKv;
use adsdesk::kv::{KvError, KvResult, KvStore};
use adsdesk::{config, AdStore, AppState};

fn state_with(kv: Arc<dyn KvStore>) -> web::Data<AppState> {
    web::Data::new(AppState { store: AdStore::new(kv) })
}

fn state() -> web::Data<AppState> {
    state_with(Arc::new(InMemKv::new()))
}

/// Backend whose every call fails as if the server were down.
struct DownKv;

#[async_trait]
impl KvStore for DownKv {
    async fn get(&self, _: &str) -> KvResult<Option<String>> { Err(down()) }
    async fn set(&self, _: &str, _: &str) -> KvResult<()> { Err(down()) }
    async fn set_nx(&self, _: &str, _: &str) -> KvResult<bool> { Err(down()) }
    async fn incr(&self, _: &str) -> KvResult<i64> { Err(down()) }
    async fn scan_prefix(&self, _: &str) -> KvResult<Vec<String>> { Err(down()) }
    async fn lpush(&self, _: &str, _: &str) -> KvResult<usize> { Err(down()) }
    async fn llen(&self, _: &str) -> KvResult<usize> { Err(down()) }
    async fn lindex(&self, _: &str, _: usize) -> KvResult<Option<String>> { Err(down()) }
}

fn down() -> KvError {
    KvError::Unavailable("connection refused".into())
}

#[actix_web::test]
async fn board_and_comment_flow() {
    let app = test::init_service(App::new().app_data(state()).configure(config)).await;

    // empty listing
    let req = test::TestRequest::get().uri("/api/v1/boards").to_request();
    let v: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(v, json!([]));

    // create board
    let req = test::TestRequest::post()
        .uri("/api/v1/boards")
        .set_json(json!({"creator": "alice", "text": "Selling bike"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    assert_eq!(resp.headers().get("location").unwrap(), "/api/v1/boards/1");
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["code"], "1");

    // listing
    let req = test::TestRequest::get().uri("/api/v1/boards").to_request();
    let v: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(v, json!([{"index": 1, "text": "Selling bike"}]));

    // comments
    for (who, what) in [("alice", "hi"), ("bob", "yo")] {
        let req = test::TestRequest::post()
            .uri("/api/v1/boards/1/comments")
            .set_json(json!({"creator": who, "text": what}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        assert_eq!(resp.headers().get("location").unwrap(), "/api/v1/boards/1");
    }

    // detail
    let req = test::TestRequest::get().uri("/api/v1/boards/1").to_request();
    let v: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(v["board"]["creator"], "alice");
    assert_eq!(v["board"]["text"], "Selling bike");
    assert!(!v["board"]["created_at"].as_str().unwrap().is_empty());
    assert_eq!(
        v["comments"],
        json!([{"creator": "alice", "text": "hi"}, {"creator": "bob", "text": "yo"}])
    );

    let req = test::TestRequest::get().uri("/api/v1/boards/1/comments").to_request();
    let v: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(v.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn validation_messages_are_returned() {
    let app = test::init_service(App::new().app_data(state()).configure(config)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/boards")
        .set_json(json!({"creator": "x".repeat(31), "text": "ok"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let v: Value = test::read_body_json(resp).await;
    assert_eq!(v["error"], "creator name too long");

    let req = test::TestRequest::post()
        .uri("/api/v1/boards")
        .set_json(json!({"creator": "bob", "text": "x".repeat(51)}))
        .to_request();
    let v: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(v["error"], "board name too long");

    let req = test::TestRequest::post()
        .uri("/api/v1/boards")
        .set_json(json!({"creator": "bob", "text": "ok"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::post()
        .uri("/api/v1/boards/1/comments")
        .set_json(json!({"creator": "bob", "text": "x".repeat(51)}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let v: Value = test::read_body_json(resp).await;
    assert_eq!(v["error"], "comment too long");

    // nothing was written for the rejected posts
    let req = test::TestRequest::get().uri("/api/v1/boards").to_request();
    let v: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(v.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn unknown_board_is_page_not_found() {
    let app = test::init_service(App::new().app_data(state()).configure(config)).await;

    let req = test::TestRequest::get().uri("/api/v1/boards/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let v: Value = test::read_body_json(resp).await;
    assert_eq!(v["error"], "page not found");

    let req = test::TestRequest::post()
        .uri("/api/v1/boards/abc/comments")
        .set_json(json!({"creator": "eve", "text": "orphan"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn broken_thread_is_server_error() {
    let kv = InMemKv::new();
    let app = test::init_service(
        App::new()
            .app_data(state_with(Arc::new(kv.clone())))
            .configure(config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/boards")
        .set_json(json!({"creator": "alice", "text": "Selling bike"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);
    kv.lpush("comment:board:1", "ghost").await.unwrap();

    let req = test::TestRequest::get().uri("/api/v1/boards/1").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 500);
}

#[actix_web::test]
async fn unavailable_store_is_503() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(Arc::new(DownKv)))
            .configure(config),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/boards").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 503);

    let req = test::TestRequest::post()
        .uri("/api/v1/boards")
        .set_json(json!({"creator": "alice", "text": "Selling bike"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 503);
}

#[actix_web::test]
async fn reposting_same_text_returns_existing_board() {
    let app = test::init_service(App::new().app_data(state()).configure(config)).await;

    for who in ["alice", "bob"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/boards")
            .set_json(json!({"creator": who, "text": "Selling bike"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["code"], "1");
    }

    let req = test::TestRequest::get().uri("/api/v1/boards/1").to_request();
    let v: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(v["board"]["creator"], "alice");

    let req = test::TestRequest::get().uri("/api/v1/boards").to_request();
    let v: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(v, json!([{"index": 1, "text": "Selling bike"}]));
}
