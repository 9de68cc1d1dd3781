//! Endpoint behavior: envelope shapes, status mapping and CORS headers.

mod common;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use select2_bridge::http_server::{fetch_items, route_pattern, AppState};
use select2_bridge::Select2Config;
use serde_json::{json, Value};
use std::sync::Arc;

fn app_state(config: Select2Config) -> web::Data<AppState> {
    web::Data::new(AppState {
        registry: Arc::new(common::sample_registry()),
        config,
    })
}

#[actix_web::test]
async fn test_fetch_items_success_envelope() {
    let _ = env_logger::builder().is_test(true).try_init();
    let app = test::init_service(
        App::new()
            .app_data(app_state(Select2Config::default()))
            .route(&route_pattern(""), web::get().to(fetch_items)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/shop/order/customer/?q=alp")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({
            "total": 1,
            "more": false,
            "results": [{"id": "1", "text": "Alpha"}]
        })
    );
}

#[actix_web::test]
async fn test_fetch_items_paginates() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(Select2Config::default()))
            .route(&route_pattern(""), web::get().to(fetch_items)),
    )
    .await;

    // Alpha, Beta, Gamma, Delta contain an "a"; page 2 of 2 holds the rest.
    let req = test::TestRequest::get()
        .uri("/shop/order/customer/?q=a&page=2&page_limit=2")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 4);
    assert_eq!(body["more"], false);
    assert_eq!(body["results"][0]["id"], "3");
    assert_eq!(body["results"][1]["id"], "4");
}

#[actix_web::test]
async fn test_absent_q_yields_empty_envelope() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(Select2Config::default()))
            .route(&route_pattern(""), web::get().to(fetch_items)),
    )
    .await;

    // Invalid paging values must not matter when q is absent.
    let req = test::TestRequest::get()
        .uri("/shop/order/customer/?page=-1&page_limit=0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"total": 0, "more": false, "results": []}));
}

#[actix_web::test]
async fn test_invalid_page_limit_is_bad_request() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(Select2Config::default()))
            .route(&route_pattern(""), web::get().to(fetch_items)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/shop/order/customer/?q=a&page_limit=0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid page_limit '0' passed");
}

#[actix_web::test]
async fn test_invalid_page_is_bad_request() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(Select2Config::default()))
            .route(&route_pattern(""), web::get().to(fetch_items)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/shop/order/customer/?q=a&page=-1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_unknown_entity_is_not_found() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(Select2Config::default()))
            .route(&route_pattern(""), web::get().to(fetch_items)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/shop/invoice/customer/?q=a")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Entity type shop.invoice does not exist");
}

#[actix_web::test]
async fn test_unknown_field_is_not_found() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(Select2Config::default()))
            .route(&route_pattern(""), web::get().to(fetch_items)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/shop/order/supplier/?q=a")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_callback_parameter_is_ignored() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(Select2Config::default()))
            .route(&route_pattern(""), web::get().to(fetch_items)),
    )
    .await;

    // The legacy script-injection format is gone; plain JSON comes back.
    let req = test::TestRequest::get()
        .uri("/shop/order/customer/?q=alp&callback=jsonpCallback")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().starts_with("application/json"));
}

#[actix_web::test]
async fn test_endpoint_prefix_mounting() {
    let config = Select2Config::default().with_endpoint_prefix("/select2");
    let app = test::init_service(
        App::new()
            .app_data(app_state(config.clone()))
            .route(&route_pattern(&config.endpoint_prefix), web::get().to(fetch_items)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/select2/shop/order/customer/?q=alp")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_cross_origin_requests_get_cors_headers() {
    let app = test::init_service(
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(app_state(Select2Config::default()))
            .route(&route_pattern(""), web::get().to(fetch_items)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/shop/order/customer/?q=alp")
        .insert_header(("Origin", "http://forms.example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp
        .headers()
        .contains_key("access-control-allow-origin"));
}
