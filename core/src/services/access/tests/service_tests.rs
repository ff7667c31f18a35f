//! Tests for the AccessService.

use crate::domain::entities::audit::{AuditAction, AuditEntity};
use crate::domain::entities::user::UserRole;
use crate::domain::value_objects::access::AccessScope;
use crate::domain::value_objects::actor::Actor;
use crate::errors::DomainError;
use crate::services::testing::Fixture;

#[tokio::test]
async fn test_admin_sees_everything() {
    let f = Fixture::new().await;
    let access = f.access.authorize(&f.actor(&f.admin)).await.unwrap();

    assert_eq!(access.scope, AccessScope::All);
    assert!(access.has_block(f.other_block.id));
    assert_eq!(access.origin.ip_address.as_deref(), Some("10.0.0.7"));
}

#[tokio::test]
async fn test_curator_is_scoped_to_assigned_blocks() {
    let f = Fixture::new().await;
    let access = f.access.authorize(&f.actor(&f.curator)).await.unwrap();

    assert!(access.has_block(f.block.id));
    assert!(!access.has_block(f.other_block.id));
    assert!(access.can_write());
}

#[tokio::test]
async fn test_stored_role_wins_over_token_role() {
    let f = Fixture::new().await;
    let forged = Actor::new(f.viewer.id, UserRole::Admin);

    let access = f.access.authorize(&forged).await.unwrap();

    assert_eq!(access.role, UserRole::Viewer);
    assert!(!access.can_write());
}

#[tokio::test]
async fn test_inactive_or_unknown_user_is_unauthorized() {
    let f = Fixture::new().await;
    let mut user = f.curator.clone();
    user.deactivate();
    f.users.insert(user).await;

    assert!(matches!(
        f.access.authorize(&f.actor(&f.curator)).await,
        Err(DomainError::Unauthorized)
    ));
    assert!(matches!(
        f.access
            .authorize(&Actor::new(uuid::Uuid::new_v4(), UserRole::Admin))
            .await,
        Err(DomainError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_denials_are_audited() {
    let f = Fixture::new().await;
    let access = f.access.authorize(&f.actor(&f.viewer)).await.unwrap();

    let result = f.access.require_writer(&access, AuditEntity::Contact).await;
    assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    assert!(f
        .access
        .require_admin(&access, AuditEntity::User)
        .await
        .is_err());

    let entries = f.audit_entries().await;
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.action == AuditAction::AccessDenied));
    assert_eq!(entries[0].user_id, Some(f.viewer.id));
    assert_eq!(entries[1].entity_type, AuditEntity::User);
}

#[tokio::test]
async fn test_denial_survives_audit_failure() {
    let f = Fixture::new().await;
    let access = f.access.authorize(&f.actor(&f.viewer)).await.unwrap();
    f.audit_logs.set_should_fail(true);

    let error = f
        .access
        .deny(&access, AuditEntity::Contact, None, "read-only role")
        .await;

    assert!(matches!(error, DomainError::Forbidden { .. }));
}
