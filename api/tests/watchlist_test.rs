//! Integration tests for the risk watchlist and the dashboard summary

mod common;

use actix_web::{http::StatusCode, test};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use common::{data_id, TestContext};
use kurator_api::create_app;

#[actix_web::test]
async fn test_create_schedules_first_check() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/watchlist")
        .insert_header(ctx.bearer(&ctx.curator))
        .set_json(json!({
            "full_name": "Viktor Sokolov",
            "risk_level": "high",
            "monitoring_frequency": "weekly",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    let expected = (Utc::now().date_naive() + Duration::days(7)).to_string();
    assert_eq!(body["data"]["next_check_date"], expected);
    assert_eq!(body["data"]["owner_id"], ctx.curator.id.to_string());
}

#[actix_web::test]
async fn test_viewer_cannot_add_entries() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/watchlist")
        .insert_header(ctx.bearer(&ctx.viewer))
        .set_json(json!({
            "full_name": "Viktor Sokolov",
            "risk_level": "low",
            "monitoring_frequency": "monthly",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_due_entry_leaves_queue_after_check() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let yesterday = Utc::now().date_naive() - Duration::days(1);

    let req = test::TestRequest::post()
        .uri("/api/v1/watchlist")
        .insert_header(ctx.bearer(&ctx.admin))
        .set_json(json!({
            "full_name": "Viktor Sokolov",
            "risk_level": "critical",
            "monitoring_frequency": "monthly",
            "next_check_date": yesterday,
        }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let entry_id = data_id(&body);

    let req = test::TestRequest::get()
        .uri("/api/v1/watchlist/due")
        .insert_header(ctx.bearer(&ctx.viewer))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/watchlist/{}/check", entry_id))
        .insert_header(ctx.bearer(&ctx.curator))
        .set_json(json!({ "note": "No new publications" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert!(!body["data"]["last_checked_at"].is_null());
    assert!(body["data"]["notes"]
        .as_str()
        .unwrap()
        .ends_with("No new publications"));

    let req = test::TestRequest::get()
        .uri("/api/v1/watchlist/due")
        .insert_header(ctx.bearer(&ctx.viewer))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_unknown_risk_level_is_bad_request() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/watchlist")
        .insert_header(ctx.bearer(&ctx.admin))
        .set_json(json!({
            "full_name": "Viktor Sokolov",
            "risk_level": "extreme",
            "monitoring_frequency": "weekly",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_dashboard_counts_visible_records() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(ctx.bearer(&ctx.admin))
        .set_json(json!({
            "full_name": "Oleg Morozov",
            "block_id": ctx.block.id,
            "influence_status_id": ctx.status_active.id,
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(ctx.bearer(&ctx.admin))
        .set_json(json!({ "full_name": "Nina Orlova", "block_id": ctx.other_block.id }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/v1/watchlist")
        .insert_header(ctx.bearer(&ctx.admin))
        .set_json(json!({
            "full_name": "Viktor Sokolov",
            "risk_level": "high",
            "monitoring_frequency": "weekly",
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard")
        .insert_header(ctx.bearer(&ctx.admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total_contacts"], 2);
    assert_eq!(body["data"]["watchlist"]["total"], 1);
    assert_eq!(body["data"]["watchlist"]["due"], 0);

    // The viewer only sees the block they are assigned to
    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard")
        .insert_header(ctx.bearer(&ctx.viewer))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["total_contacts"], 1);
}
