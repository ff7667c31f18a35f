//! Tests for the InteractionService.

use chrono::{Duration, NaiveDate, Utc};

use crate::domain::entities::audit::AuditAction;
use crate::domain::entities::contact::Contact;
use crate::domain::entities::interaction::{InteractionUpdate, NewInteraction};
use crate::errors::{DomainError, ValidationError};
use crate::repositories::{ContactRepository, InteractionRepository};
use crate::services::testing::Fixture;

fn new_interaction(contact: &Contact) -> NewInteraction {
    NewInteraction {
        contact_id: contact.id,
        occurred_at: None,
        interaction_type_id: None,
        channel_id: None,
        comment: None,
        new_status_id: None,
        status_reason: None,
        next_touch_date: None,
    }
}

#[tokio::test]
async fn test_create_updates_contact() {
    let f = Fixture::new().await;
    let service = f.interaction_service();
    let contact = f.seed_contact("Anna Sokolova", &f.block).await;
    let occurred_at = Utc::now() - Duration::hours(2);
    let next_touch = NaiveDate::from_ymd_opt(2030, 3, 1);

    let interaction = service
        .create(
            &f.actor(&f.curator),
            NewInteraction {
                occurred_at: Some(occurred_at),
                interaction_type_id: Some(f.meeting_type.id),
                channel_id: Some(f.phone_channel.id),
                comment: Some("Discussed the spring forum".to_string()),
                next_touch_date: next_touch,
                ..new_interaction(&contact)
            },
        )
        .await
        .unwrap();

    assert_eq!(interaction.author_id, f.curator.id);
    assert!(interaction.status_change.is_none());

    let stored = f.contacts.find_by_id(contact.id).await.unwrap().unwrap();
    assert_eq!(stored.last_interaction_at, Some(occurred_at));
    assert_eq!(stored.next_touch_date, next_touch);
    assert_eq!(f.audit_actions().await, vec![AuditAction::Create]);
}

#[tokio::test]
async fn test_create_with_status_change() {
    let f = Fixture::new().await;
    let service = f.interaction_service();
    let contact = f.seed_contact("Anna Sokolova", &f.block).await;

    let interaction = service
        .create(
            &f.actor(&f.curator),
            NewInteraction {
                new_status_id: Some(f.status_warm.id),
                status_reason: Some("positive meeting".to_string()),
                ..new_interaction(&contact)
            },
        )
        .await
        .unwrap();

    let change = interaction.status_change.unwrap();
    assert_eq!(change.from_status_id, None);
    assert_eq!(change.to_status_id, f.status_warm.id);

    let history = f.contacts.status_history(contact.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].interaction_id, Some(interaction.id));
    assert_eq!(history[0].reason.as_deref(), Some("positive meeting"));

    let stored = f.contacts.find_by_id(contact.id).await.unwrap().unwrap();
    assert_eq!(stored.influence_status_id, Some(f.status_warm.id));
    assert_eq!(
        f.audit_actions().await,
        vec![AuditAction::Create, AuditAction::StatusChange]
    );
}

#[tokio::test]
async fn test_same_status_is_not_a_change() {
    let f = Fixture::new().await;
    let mut contact = f.seed_contact("Anna Sokolova", &f.block).await;
    contact.influence_status_id = Some(f.status_cold.id);
    f.contacts.insert(contact.clone()).await;

    let interaction = f
        .interaction_service()
        .create(
            &f.actor(&f.curator),
            NewInteraction {
                new_status_id: Some(f.status_cold.id),
                ..new_interaction(&contact)
            },
        )
        .await
        .unwrap();

    assert!(interaction.status_change.is_none());
    assert!(f.contacts.status_history(contact.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_future_dates_are_rejected() {
    let f = Fixture::new().await;
    let service = f.interaction_service();
    let contact = f.seed_contact("Anna Sokolova", &f.block).await;
    let curator = f.actor(&f.curator);

    let far = service
        .create(
            &curator,
            NewInteraction {
                occurred_at: Some(Utc::now() + Duration::minutes(30)),
                ..new_interaction(&contact)
            },
        )
        .await;
    assert!(matches!(
        far,
        Err(DomainError::ValidationErr(ValidationError::InvalidDate { .. }))
    ));

    let skewed = service
        .create(
            &curator,
            NewInteraction {
                occurred_at: Some(Utc::now() + Duration::minutes(2)),
                ..new_interaction(&contact)
            },
        )
        .await;
    assert!(skewed.is_ok());
}

#[tokio::test]
async fn test_reference_categories_are_checked() {
    let f = Fixture::new().await;
    let contact = f.seed_contact("Anna Sokolova", &f.block).await;

    let result = f
        .interaction_service()
        .create(
            &f.actor(&f.curator),
            NewInteraction {
                interaction_type_id: Some(f.phone_channel.id),
                ..new_interaction(&contact)
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(DomainError::ValidationErr(ValidationError::InvalidReference { .. }))
    ));
}

#[tokio::test]
async fn test_viewer_and_foreign_curator_cannot_log() {
    let f = Fixture::new().await;
    let service = f.interaction_service();
    let contact = f.seed_contact("Anna Sokolova", &f.block).await;

    assert!(matches!(
        service.create(&f.actor(&f.viewer), new_interaction(&contact)).await,
        Err(DomainError::Forbidden { .. })
    ));
    assert!(matches!(
        service
            .create(&f.actor(&f.other_curator), new_interaction(&contact))
            .await,
        Err(DomainError::Forbidden { .. })
    ));
}

#[tokio::test]
async fn test_list_newest_first() {
    let f = Fixture::new().await;
    let service = f.interaction_service();
    let curator = f.actor(&f.curator);
    let contact = f.seed_contact("Anna Sokolova", &f.block).await;

    for days in [5, 1, 3] {
        service
            .create(
                &curator,
                NewInteraction {
                    occurred_at: Some(Utc::now() - Duration::days(days)),
                    ..new_interaction(&contact)
                },
            )
            .await
            .unwrap();
    }

    let list = service.list_for_contact(&f.actor(&f.viewer), contact.id).await.unwrap();
    assert_eq!(list.len(), 3);
    assert!(list[0].occurred_at > list[1].occurred_at);
    assert!(list[1].occurred_at > list[2].occurred_at);
}

#[tokio::test]
async fn test_only_author_or_admin_edits() {
    let f = Fixture::new().await;
    let service = f.interaction_service();
    let contact = f.seed_contact("Anna Sokolova", &f.block).await;
    let interaction = service
        .create(&f.actor(&f.curator), new_interaction(&contact))
        .await
        .unwrap();

    // A second curator in the same block
    let mut block = f.block.clone();
    block.assign_curators(vec![f.curator.id, f.viewer.id, f.other_curator.id]);
    f.blocks.insert(block).await;

    let update = InteractionUpdate {
        comment: Some(Some("edited".to_string())),
        ..Default::default()
    };
    assert!(matches!(
        service
            .update(&f.actor(&f.other_curator), interaction.id, update.clone())
            .await,
        Err(DomainError::Forbidden { .. })
    ));

    let edited = service
        .update(&f.actor(&f.admin), interaction.id, update)
        .await
        .unwrap();
    assert_eq!(edited.comment.as_deref(), Some("edited"));
}

#[tokio::test]
async fn test_delete_recomputes_last_interaction() {
    let f = Fixture::new().await;
    let service = f.interaction_service();
    let curator = f.actor(&f.curator);
    let contact = f.seed_contact("Anna Sokolova", &f.block).await;
    let older = Utc::now() - Duration::days(10);
    let newer = Utc::now() - Duration::days(1);

    service
        .create(
            &curator,
            NewInteraction {
                occurred_at: Some(older),
                ..new_interaction(&contact)
            },
        )
        .await
        .unwrap();
    let latest = service
        .create(
            &curator,
            NewInteraction {
                occurred_at: Some(newer),
                ..new_interaction(&contact)
            },
        )
        .await
        .unwrap();

    service.delete(&curator, latest.id).await.unwrap();

    let stored = f.contacts.find_by_id(contact.id).await.unwrap().unwrap();
    assert_eq!(stored.last_interaction_at, Some(older));
    let deleted = f.interactions.find_by_id(latest.id).await.unwrap().unwrap();
    assert!(!deleted.is_active);
    assert!(matches!(
        service.get(&curator, latest.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_deleted_contact_takes_no_interactions() {
    let f = Fixture::new().await;
    let mut contact = f.seed_contact("Anna Sokolova", &f.block).await;
    contact.is_active = false;
    f.contacts.insert(contact.clone()).await;

    let result = f
        .interaction_service()
        .create(&f.actor(&f.admin), new_interaction(&contact))
        .await;
    assert!(matches!(
        result,
        Err(DomainError::ValidationErr(ValidationError::BusinessRuleViolation { .. }))
    ));
}
