//! Integration tests for contact cards, scope checks and status history

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use common::{data_id, TestContext};
use kurator_api::create_app;
use kurator_core::{AuditAction, AuditEntity};

#[actix_web::test]
async fn test_curator_creates_contact_in_assigned_block() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(ctx.bearer(&ctx.curator))
        .set_json(json!({
            "full_name": "Oleg Morozov",
            "position": "Deputy head",
            "phone": "+7 900 123-45-67",
            "block_id": ctx.block.id,
            "influence_status_id": ctx.status_neutral.id,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["full_name"], "Oleg Morozov");
    // Curators default to being responsible for what they create
    assert_eq!(body["data"]["responsible_user_id"], ctx.curator.id.to_string());

    let logs = ctx.audit_logs.get_all_logs().await;
    assert!(logs
        .iter()
        .any(|log| log.action == AuditAction::Create && log.entity_type == AuditEntity::Contact));
}

#[actix_web::test]
async fn test_curator_cannot_create_outside_scope() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(ctx.bearer(&ctx.curator))
        .set_json(json!({ "full_name": "Oleg Morozov", "block_id": ctx.other_block.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "FORBIDDEN");
}

#[actix_web::test]
async fn test_viewer_cannot_create_contacts() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(ctx.bearer(&ctx.viewer))
        .set_json(json!({ "full_name": "Oleg Morozov", "block_id": ctx.block.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_create_rejects_empty_name() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(ctx.bearer(&ctx.admin))
        .set_json(json!({ "full_name": "", "block_id": ctx.block.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"]["fields"]["full_name"].is_array());
}

#[actix_web::test]
async fn test_duplicate_name_in_block_conflicts() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let payload = json!({ "full_name": "Oleg Morozov", "block_id": ctx.block.id });

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(ctx.bearer(&ctx.admin))
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(ctx.bearer(&ctx.admin))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "DUPLICATE_VALUE");
}

#[actix_web::test]
async fn test_list_only_shows_contacts_in_scope() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    for (name, block_id) in [("Oleg Morozov", ctx.block.id), ("Nina Orlova", ctx.other_block.id)] {
        let req = test::TestRequest::post()
            .uri("/api/v1/contacts")
            .insert_header(ctx.bearer(&ctx.admin))
            .set_json(json!({ "full_name": name, "block_id": block_id }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/contacts")
        .insert_header(ctx.bearer(&ctx.viewer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["full_name"], "Oleg Morozov");

    let req = test::TestRequest::get()
        .uri("/api/v1/contacts?search=orlova")
        .insert_header(ctx.bearer(&ctx.admin))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["full_name"], "Nina Orlova");
}

#[actix_web::test]
async fn test_status_change_is_recorded_in_history() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(ctx.bearer(&ctx.curator))
        .set_json(json!({
            "full_name": "Oleg Morozov",
            "block_id": ctx.block.id,
            "influence_status_id": ctx.status_neutral.id,
        }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let contact_id = data_id(&body);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/contacts/{}/status", contact_id))
        .insert_header(ctx.bearer(&ctx.curator))
        .set_json(json!({ "status_id": ctx.status_active.id, "reason": "Backed the initiative" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["influence_status_id"], ctx.status_active.id.to_string());

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/contacts/{}/history", contact_id))
        .insert_header(ctx.bearer(&ctx.viewer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let history = body["data"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["new_status_id"], ctx.status_active.id.to_string());
    assert_eq!(history[0]["old_status_id"], ctx.status_neutral.id.to_string());
    assert_eq!(history[0]["reason"], "Backed the initiative");
}

#[actix_web::test]
async fn test_deleted_contact_is_hidden_until_restored() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(ctx.bearer(&ctx.admin))
        .set_json(json!({ "full_name": "Oleg Morozov", "block_id": ctx.block.id }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let contact_id = data_id(&body);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/contacts/{}", contact_id))
        .insert_header(ctx.bearer(&ctx.admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/contacts/{}", contact_id))
        .insert_header(ctx.bearer(&ctx.curator))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/contacts/{}/restore", contact_id))
        .insert_header(ctx.bearer(&ctx.admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["is_active"], true);
}

#[actix_web::test]
async fn test_interaction_updates_contact_and_feed() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(ctx.bearer(&ctx.curator))
        .set_json(json!({ "full_name": "Oleg Morozov", "block_id": ctx.block.id }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let contact_id = data_id(&body);

    let req = test::TestRequest::post()
        .uri("/api/v1/interactions")
        .insert_header(ctx.bearer(&ctx.curator))
        .set_json(json!({
            "contact_id": contact_id,
            "comment": "Met at the regional forum",
            "new_status_id": ctx.status_active.id,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/contacts/{}/interactions", contact_id))
        .insert_header(ctx.bearer(&ctx.curator))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let feed = body["data"].as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["comment"], "Met at the regional forum");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/contacts/{}", contact_id))
        .insert_header(ctx.bearer(&ctx.curator))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["influence_status_id"], ctx.status_active.id.to_string());
    assert!(!body["data"]["last_interaction_at"].is_null());
}

#[actix_web::test]
async fn test_invalid_contact_id_is_bad_request() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/contacts/not-a-uuid")
        .insert_header(ctx.bearer(&ctx.admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
