use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};

use killstats::{
    config, constants,
    storage::{MemoryStorage, Storage},
};

fn loopback() -> SocketAddr {
    "127.0.0.1:51000".parse().expect("valid socket address")
}

fn remote() -> SocketAddr {
    "203.0.113.9:51000".parse().expect("valid socket address")
}

macro_rules! app {
    ($storage:expr) => {{
        let storage: Arc<dyn Storage> = $storage;
        test::init_service(
            App::new()
                .app_data(web::Data::from(storage))
                .configure(config::app::config_services),
        )
        .await
    }};
}

fn json_request(method: &str, uri: &str, body: Value) -> test::TestRequest {
    let request = match method {
        "POST" => test::TestRequest::post(),
        "PUT" => test::TestRequest::put(),
        _ => panic!("unsupported method {}", method),
    };
    request
        .uri(uri)
        .insert_header(header::ContentType::json())
        .set_payload(body.to_string())
        .peer_addr(loopback())
}

async fn body_text(resp: ServiceResponse) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).expect("utf-8 body")
}

fn valid_user(username: &str) -> Value {
    json!({
        "username": username,
        "password": "Test1234",
        "first_name": "Test",
        "last_name": "User",
    })
}

#[actix_web::test]
async fn test_create_user_returns_insert_id() {
    let app = app!(Arc::new(MemoryStorage::new()));

    let resp = test::call_service(
        &app,
        json_request("POST", "/createUser", valid_user("testuser1")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"insertId": 1}));
}

#[actix_web::test]
async fn test_invalid_user_lists_every_violation() {
    let storage = Arc::new(MemoryStorage::new());
    let app = app!(storage.clone());

    let resp = test::call_service(
        &app,
        json_request("POST", "/createUser", json!({"username": "", "password": "abc"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    let fields: Vec<_> = body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .map(|e| e["field"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(
        fields,
        vec!["username", "password", "password", "first_name", "first_name", "last_name", "last_name"]
    );
    assert!(storage.list_users(None).await.expect("list").is_empty());
}

#[actix_web::test]
async fn test_user_crud_messages() {
    let app = app!(Arc::new(MemoryStorage::new()));
    test::call_service(&app, json_request("POST", "/createUser", valid_user("bob")).to_request()).await;

    let resp = test::call_service(
        &app,
        json_request("PUT", "/users/1", valid_user("bobby")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, constants::MESSAGE_USER_UPDATED);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/users/search?username=obb").to_request(),
    )
    .await;
    let users: Value = test::read_body_json(resp).await;
    assert_eq!(users[0]["username"], "bobby");
    assert!(users[0].get("password").is_none());

    for _ in 0..2 {
        let resp = test::call_service(&app, test::TestRequest::delete().uri("/users/1").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, constants::MESSAGE_USER_DELETED);
    }
}

#[actix_web::test]
async fn test_list_users_sort_validation() {
    let app = app!(Arc::new(MemoryStorage::new()));

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/users?sort_by=invalid_field").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/users?sort_by=username&order=asc").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let users: Value = test::read_body_json(resp).await;
    assert_eq!(users, json!([]));
}

#[actix_web::test]
async fn test_bulk_delete_is_loopback_only() {
    let storage = Arc::new(MemoryStorage::new());
    let app = app!(storage.clone());
    test::call_service(&app, json_request("POST", "/createUser", valid_user("idle")).to_request()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/deleteUsersBelowKills?kills=10")
            .peer_addr(remote())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_text(resp).await, constants::MESSAGE_LOCALHOST_ONLY);
    assert_eq!(storage.list_users(None).await.expect("list").len(), 1);

    // Remote peers are refused before validation runs.
    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/deleteUsersBelowKills?kills=oops")
            .peer_addr(remote())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Unmatched methods are not found for any peer; only the DELETE route is gated.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/deleteUsersBelowKills?kills=10")
            .peer_addr(remote())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "Cannot GET /deleteUsersBelowKills");

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/deleteUsersBelowKills?kills=oops")
            .peer_addr(loopback())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/deleteUsersBelowKills?kills=10")
            .peer_addr("[::1]:51000".parse().expect("valid socket address"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, constants::MESSAGE_USERS_DELETED);
    assert!(storage.list_users(None).await.expect("list").is_empty());
}

#[actix_web::test]
async fn test_statistics_routes() {
    let app = app!(Arc::new(MemoryStorage::new()));

    for day in 1..=12 {
        let body = json!({"user_id": 1, "kills": day, "date": format!("2023-01-{:02}", day)});
        let resp = test::call_service(&app, json_request("POST", "/addStatistics", body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(body_text(resp).await, constants::MESSAGE_STATISTIC_CREATED);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/statistics/paginate?limit=10&offset=0").to_request(),
    )
    .await;
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page.as_array().map(Vec::len), Some(10));

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/statistics/paginate?limit=0&offset=4").to_request(),
    )
    .await;
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page, json!([]));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/statistics/search?start_date=2023-01-01&end_date=2023-01-05")
            .to_request(),
    )
    .await;
    let range: Value = test::read_body_json(resp).await;
    assert_eq!(range.as_array().map(Vec::len), Some(5));

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/statistics/searchByDate?date=2023-01-03").to_request(),
    )
    .await;
    let exact: Value = test::read_body_json(resp).await;
    assert_eq!(exact[0]["kills"], 3);
    assert_eq!(exact[0]["date"], "2023-01-03");

    let resp = test::call_service(
        &app,
        json_request("PUT", "/statistics/3", json!({"user_id": 1, "kills": 30, "date": "2023-01-03"}))
            .to_request(),
    )
    .await;
    assert_eq!(body_text(resp).await, constants::MESSAGE_STATISTIC_UPDATED);

    let resp = test::call_service(&app, test::TestRequest::delete().uri("/statistics/3").to_request()).await;
    assert_eq!(body_text(resp).await, constants::MESSAGE_STATISTIC_DELETED);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/statistics").to_request()).await;
    let all: Value = test::read_body_json(resp).await;
    assert_eq!(all.as_array().map(Vec::len), Some(11));
}

#[actix_web::test]
async fn test_date_range_failures() {
    let app = app!(Arc::new(MemoryStorage::new()));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/statistics/search?start_date=2023-01-31&end_date=2023-01-01")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["message"], constants::MESSAGE_END_DATE_AFTER_START);

    // With no end date the range ends today, which is before this start.
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/statistics/search?start_date=2999-01-01").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(resp).await, constants::MESSAGE_END_BEFORE_START);
}

#[actix_web::test]
async fn test_unmatched_routes_are_not_found() {
    let app = app!(Arc::new(MemoryStorage::new()));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/nowhere").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "Cannot GET /nowhere");

    let resp = test::call_service(&app, test::TestRequest::delete().uri("/users/abc").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, test::TestRequest::patch().uri("/statistics").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_liveness() {
    let app = app!(Arc::new(MemoryStorage::new()));
    let resp = test::call_service(&app, test::TestRequest::get().uri("/testRunning").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, constants::MESSAGE_SERVER_RUNNING);
}
