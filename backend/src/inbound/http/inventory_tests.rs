//! Tests for inventory HTTP handlers.

use super::*;
use crate::domain::ports::memory::MemoryRedemptionStore;
use crate::domain::{Category, InventoryReadService, PlayerId, RedemptionCoordinator};
use crate::domain::ports::RedemptionStore;
use crate::inbound::http::auth::{API_KEY_HEADER, ApiCredential};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use serde_json::Value;
use std::sync::Arc;

const TEST_KEY: &str = "test-api-key";

fn seeded_store() -> Arc<MemoryRedemptionStore> {
    let store = Arc::new(MemoryRedemptionStore::new());
    store.seed_code(1, Category::Coins, "A1");
    store.seed_code(2, Category::Coins, "A2");
    store.seed_code(3, Category::Cashback, "C1");
    store
}

fn test_app(
    store: Arc<MemoryRedemptionStore>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(
        Arc::new(RedemptionCoordinator::new(Arc::clone(&store))),
        Arc::new(InventoryReadService::new(store)),
        ApiCredential::new(TEST_KEY),
    );
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .service(code_status)
            .service(peek_next)
            .service(stats),
    )
}

fn get(uri: &str) -> actix_web::test::TestRequest {
    actix_test::TestRequest::get()
        .uri(uri)
        .insert_header((API_KEY_HEADER, TEST_KEY))
}

#[actix_web::test]
async fn status_reports_an_available_code() {
    let app = actix_test::init_service(test_app(seeded_store())).await;

    let response = actix_test::call_service(&app, get("/api/v1/status?code=A1").to_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("A1"));
    assert_eq!(body.get("available").and_then(Value::as_bool), Some(true));
    assert!(body.get("redemption").expect("field present").is_null());
}

#[actix_web::test]
async fn status_includes_the_redemption_once_consumed() {
    let store = seeded_store();
    store
        .redeem(Category::Coins, PlayerId::new(7).expect("non-negative"), None)
        .await
        .expect("store ok");
    let app = actix_test::init_service(test_app(store)).await;

    let response = actix_test::call_service(
        &app,
        get("/api/v1/status?code=A1&category=COINS").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("available").and_then(Value::as_bool), Some(false));
    let redemption = body.get("redemption").expect("redemption");
    assert_eq!(redemption.get("playerId").and_then(Value::as_i64), Some(7));
}

#[actix_web::test]
async fn status_for_unknown_code_is_not_found() {
    let app = actix_test::init_service(test_app(seeded_store())).await;

    let response =
        actix_test::call_service(&app, get("/api/v1/status?code=missing").to_request()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn status_without_a_code_is_rejected() {
    let app = actix_test::init_service(test_app(seeded_store())).await;

    let response = actix_test::call_service(&app, get("/api/v1/status").to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn peek_previews_without_consuming() {
    let app = actix_test::init_service(test_app(seeded_store())).await;

    for _ in 0..2 {
        let response =
            actix_test::call_service(&app, get("/api/v1/peek?category=COINS").to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("id").and_then(Value::as_i64), Some(1));
        assert_eq!(body.get("value").and_then(Value::as_str), Some("A1"));
    }
}

#[actix_web::test]
async fn peek_on_an_empty_category_is_not_found() {
    let store = Arc::new(MemoryRedemptionStore::new());
    let app = actix_test::init_service(test_app(store)).await;

    let response =
        actix_test::call_service(&app, get("/api/v1/peek?category=CASHBACK").to_request()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn stats_cover_every_category() {
    let store = seeded_store();
    store
        .redeem(Category::Coins, PlayerId::new(7).expect("non-negative"), None)
        .await
        .expect("store ok");
    let app = actix_test::init_service(test_app(store)).await;

    let response = actix_test::call_service(&app, get("/api/v1/stats").to_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    let categories = body
        .get("categories")
        .and_then(Value::as_array)
        .expect("categories");
    assert_eq!(categories.len(), 2);
    let coins = categories
        .iter()
        .find(|entry| entry.get("category").and_then(Value::as_str) == Some("COINS"))
        .expect("coins entry");
    assert_eq!(coins.get("remaining").and_then(Value::as_u64), Some(1));
    assert_eq!(coins.get("used").and_then(Value::as_u64), Some(1));
}

#[actix_web::test]
async fn inventory_endpoints_require_the_api_key() {
    let app = actix_test::init_service(test_app(seeded_store())).await;

    for uri in ["/api/v1/status?code=A1", "/api/v1/peek?category=COINS", "/api/v1/stats"] {
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(uri).to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}
