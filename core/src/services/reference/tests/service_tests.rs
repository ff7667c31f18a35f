//! Tests for the ReferenceService.

use crate::domain::entities::audit::AuditAction;
use crate::domain::entities::reference::{NewReferenceValue, ReferenceCategory, ReferenceUpdate};
use crate::errors::{DomainError, ValidationError};
use crate::services::testing::Fixture;

fn new_status(code: &str) -> NewReferenceValue {
    NewReferenceValue {
        category: ReferenceCategory::InfluenceStatus,
        code: code.to_string(),
        label: "Strong ally".to_string(),
        sort_order: 5,
    }
}

#[tokio::test]
async fn test_list_orders_and_hides_inactive_from_non_admins() {
    let f = Fixture::new().await;
    let service = f.reference_service();

    let statuses = service
        .list(&f.actor(&f.curator), Some(ReferenceCategory::InfluenceStatus), true)
        .await
        .unwrap();
    let codes: Vec<&str> = statuses.iter().map(|v| v.code.as_str()).collect();
    assert_eq!(codes, vec!["COLD", "WARM"]);

    let statuses = service
        .list(&f.actor(&f.admin), Some(ReferenceCategory::InfluenceStatus), true)
        .await
        .unwrap();
    assert_eq!(statuses.len(), 3);
}

#[tokio::test]
async fn test_admin_creates_value() {
    let f = Fixture::new().await;
    let service = f.reference_service();

    let value = service
        .create(&f.actor(&f.admin), new_status("STRONG_ALLY"))
        .await
        .unwrap();

    assert_eq!(value.code, "STRONG_ALLY");
    assert!(value.is_active);
    assert_eq!(f.audit_actions().await, vec![AuditAction::Create]);
}

#[tokio::test]
async fn test_create_rejects_bad_and_duplicate_codes() {
    let f = Fixture::new().await;
    let service = f.reference_service();
    let admin = f.actor(&f.admin);

    assert!(matches!(
        service.create(&admin, new_status("strong ally")).await,
        Err(DomainError::ValidationErr(ValidationError::InvalidFormat { .. }))
    ));
    assert!(matches!(
        service.create(&admin, new_status("COLD")).await,
        Err(DomainError::ValidationErr(ValidationError::DuplicateValue { .. }))
    ));
}

#[tokio::test]
async fn test_same_code_allowed_in_other_category() {
    let f = Fixture::new().await;
    let value = f
        .reference_service()
        .create(
            &f.actor(&f.admin),
            NewReferenceValue {
                category: ReferenceCategory::RiskSphere,
                code: "COLD".to_string(),
                label: "Cold storage".to_string(),
                sort_order: 2,
            },
        )
        .await
        .unwrap();
    assert_eq!(value.category, ReferenceCategory::RiskSphere);
}

#[tokio::test]
async fn test_curator_cannot_write_and_denial_is_audited() {
    let f = Fixture::new().await;
    let result = f
        .reference_service()
        .create(&f.actor(&f.curator), new_status("NEW_ONE"))
        .await;

    assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    let entries = f.audit_entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, AuditAction::AccessDenied);
    assert_eq!(entries[0].user_id, Some(f.curator.id));
}

#[tokio::test]
async fn test_update_and_deactivate() {
    let f = Fixture::new().await;
    let service = f.reference_service();
    let admin = f.actor(&f.admin);

    let updated = service
        .update(
            &admin,
            f.status_warm.id,
            ReferenceUpdate {
                label: Some("Warm lead".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.label, "Warm lead");

    service.deactivate(&admin, f.status_warm.id).await.unwrap();
    assert!(matches!(
        service
            .require_active(f.status_warm.id, ReferenceCategory::InfluenceStatus)
            .await,
        Err(DomainError::ValidationErr(ValidationError::InvalidReference { .. }))
    ));
    assert_eq!(
        f.audit_actions().await,
        vec![AuditAction::Update, AuditAction::Delete]
    );
}

#[tokio::test]
async fn test_require_active_checks_category() {
    let f = Fixture::new().await;
    let service = f.reference_service();

    assert!(service
        .require_active(f.status_cold.id, ReferenceCategory::InfluenceStatus)
        .await
        .is_ok());
    assert!(service
        .require_active(f.status_cold.id, ReferenceCategory::InteractionType)
        .await
        .is_err());
    assert!(service
        .require_active(f.status_retired.id, ReferenceCategory::InfluenceStatus)
        .await
        .is_err());
}
