//! Integration tests for user, block and reference administration, the
//! audit log and the unauthenticated endpoints

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use common::{data_id, TestContext, PASSWORD};
use kurator_api::create_app;
use kurator_core::{AuditAction, AuditEntity};

#[actix_web::test]
async fn test_health_reports_healthy_without_database() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_unknown_route_returns_json_404() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri("/nowhere").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_web::test]
async fn test_admin_creates_user_who_can_log_in() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header(ctx.bearer(&ctx.admin))
        .set_json(json!({
            "login": "n.ivanova",
            "display_name": "Natalia Ivanova",
            "password": "Welcome2024",
            "role": "curator",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["role"], "curator");
    assert!(body["data"].get("password_hash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "login": "n.ivanova", "password": "Welcome2024" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_duplicate_login_conflicts() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header(ctx.bearer(&ctx.admin))
        .set_json(json!({
            "login": "i.petrova",
            "display_name": "Another Irina",
            "password": PASSWORD,
            "role": "viewer",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_curator_cannot_manage_users() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/users")
        .insert_header(ctx.bearer(&ctx.curator))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_deactivated_user_token_stops_working() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let viewer_token = ctx.bearer(&ctx.viewer);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/users/{}", ctx.viewer.id))
        .insert_header(ctx.bearer(&ctx.admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/contacts")
        .insert_header(viewer_token)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_block_curator_assignment_grants_scope() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/blocks")
        .insert_header(ctx.bearer(&ctx.admin))
        .set_json(json!({ "name": "Media", "description": "Editors and journalists" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let block_id = data_id(&test::read_body_json(resp).await);

    let contact = json!({ "full_name": "Pavel Kuznetsov", "block_id": block_id });
    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(ctx.bearer(&ctx.curator))
        .set_json(&contact)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/blocks/{}/curators", block_id))
        .insert_header(ctx.bearer(&ctx.admin))
        .set_json(json!({ "user_ids": [ctx.curator.id] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(ctx.bearer(&ctx.curator))
        .set_json(&contact)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn test_reference_values_are_listed_by_category() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/references")
        .insert_header(ctx.bearer(&ctx.admin))
        .set_json(json!({
            "category": "interaction_channel",
            "code": "PHONE",
            "label": "Phone call",
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/v1/references?category=influence_status")
        .insert_header(ctx.bearer(&ctx.viewer))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let values = body["data"].as_array().unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0]["code"], "ACTIVE");
}

#[actix_web::test]
async fn test_reference_code_must_be_upper_case() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/references")
        .insert_header(ctx.bearer(&ctx.admin))
        .set_json(json!({
            "category": "risk_sphere",
            "code": "media",
            "label": "Media",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["details"]["field"], "code");
}

#[actix_web::test]
async fn test_audit_log_is_admin_only() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/audit-logs")
        .insert_header(ctx.bearer(&ctx.curator))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let logs = ctx.audit_logs.get_all_logs().await;
    assert!(logs.iter().any(|log| log.action == AuditAction::AccessDenied
        && log.user_id == Some(ctx.curator.id)
        && !log.success));
}

#[actix_web::test]
async fn test_audit_log_filters_by_entity() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(ctx.bearer(&ctx.admin))
        .set_json(json!({ "full_name": "Oleg Morozov", "block_id": ctx.block.id }))
        .to_request();
    let contact_id = data_id(&test::read_body_json(test::call_service(&app, req).await).await);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/audit-logs?entity_type={}&entity_id={}",
            AuditEntity::Contact.as_str(),
            contact_id
        ))
        .insert_header(ctx.bearer(&ctx.admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["action"], "CREATE");
    // Audit details never carry contact PII
    assert!(!body["data"]["data"][0]["details"]
        .to_string()
        .contains("Oleg Morozov"));
}

#[actix_web::test]
async fn test_audit_log_rejects_unknown_action() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/audit-logs?action=EXPLODE")
        .insert_header(ctx.bearer(&ctx.admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
