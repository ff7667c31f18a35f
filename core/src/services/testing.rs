//! Shared fixture for the service tests: in-memory repositories seeded with
//! one user per role, two blocks and a handful of reference values.

use std::sync::Arc;

use crate::domain::entities::audit::{AuditAction, AuditLog};
use crate::domain::entities::block::Block;
use crate::domain::entities::contact::{Contact, NewContact};
use crate::domain::entities::reference::{ReferenceCategory, ReferenceValue};
use crate::domain::entities::user::{User, UserRole};
use crate::domain::value_objects::actor::{Actor, RequestOrigin};
use crate::repositories::{
    MockAuditLogRepository, MockBlockRepository, MockContactRepository,
    MockInteractionRepository, MockReferenceRepository, MockUserRepository,
    MockWatchlistRepository,
};
use crate::services::access::AccessService;
use crate::services::audit::{AuditService, AuditServiceConfig};
use crate::services::block::BlockService;
use crate::services::contact::ContactService;
use crate::services::dashboard::{DashboardConfig, DashboardService};
use crate::services::encryption::PasswordHasher;
use crate::services::interaction::InteractionService;
use crate::services::reference::ReferenceService;
use crate::services::user::UserService;
use crate::services::watchlist::WatchlistService;

pub(crate) const PASSWORD: &str = "curator2024";

pub(crate) struct Fixture {
    pub users: Arc<MockUserRepository>,
    pub blocks: Arc<MockBlockRepository>,
    pub contacts: Arc<MockContactRepository>,
    pub interactions: Arc<MockInteractionRepository>,
    pub references: Arc<MockReferenceRepository>,
    pub watchlist: Arc<MockWatchlistRepository>,
    pub audit_logs: Arc<MockAuditLogRepository>,

    pub audit: Arc<AuditService>,
    pub access: Arc<AccessService>,
    pub hasher: PasswordHasher,

    pub admin: User,
    pub curator: User,
    pub other_curator: User,
    pub viewer: User,

    /// Assigned to `curator` and `viewer`
    pub block: Block,
    /// Assigned to `other_curator`
    pub other_block: Block,

    pub status_cold: ReferenceValue,
    pub status_warm: ReferenceValue,
    pub status_retired: ReferenceValue,
    pub meeting_type: ReferenceValue,
    pub phone_channel: ReferenceValue,
    pub sphere: ReferenceValue,
}

impl Fixture {
    pub async fn new() -> Self {
        let users = Arc::new(MockUserRepository::new());
        let blocks = Arc::new(MockBlockRepository::new());
        let contacts = Arc::new(MockContactRepository::new());
        let interactions = Arc::new(MockInteractionRepository::new());
        let references = Arc::new(MockReferenceRepository::new());
        let watchlist = Arc::new(MockWatchlistRepository::new());
        let audit_logs = Arc::new(MockAuditLogRepository::new());

        let hasher = PasswordHasher::new(4);
        let hash = bcrypt::hash(PASSWORD, 4).unwrap();

        let admin = User::new("admin", "Olga Admin", hash.clone(), UserRole::Admin);
        let curator = User::new("i.petrova", "Irina Petrova", hash.clone(), UserRole::Curator);
        let other_curator = User::new("s.lebedev", "Sergei Lebedev", hash.clone(), UserRole::Curator);
        let viewer = User::new("m.kuznetsova", "Maria Kuznetsova", hash, UserRole::Viewer);
        for user in [&admin, &curator, &other_curator, &viewer] {
            users.insert(user.clone()).await;
        }

        let mut block = Block::new("North", Some("Northern region".to_string()));
        block.assign_curators(vec![curator.id, viewer.id]);
        let mut other_block = Block::new("South", None);
        other_block.assign_curators(vec![other_curator.id]);
        blocks.insert(block.clone()).await;
        blocks.insert(other_block.clone()).await;

        let status_cold = ReferenceValue::new(ReferenceCategory::InfluenceStatus, "COLD", "Cold", 1);
        let status_warm = ReferenceValue::new(ReferenceCategory::InfluenceStatus, "WARM", "Warm", 2);
        let mut status_retired =
            ReferenceValue::new(ReferenceCategory::InfluenceStatus, "RETIRED", "Retired", 9);
        status_retired.is_active = false;
        let meeting_type = ReferenceValue::new(ReferenceCategory::InteractionType, "MEETING", "Meeting", 1);
        let phone_channel = ReferenceValue::new(ReferenceCategory::InteractionChannel, "PHONE", "Phone", 1);
        let sphere = ReferenceValue::new(ReferenceCategory::RiskSphere, "FINANCE", "Finance", 1);
        for value in [
            &status_cold,
            &status_warm,
            &status_retired,
            &meeting_type,
            &phone_channel,
            &sphere,
        ] {
            references.insert(value.clone()).await;
        }

        let audit = Arc::new(AuditService::new(
            audit_logs.clone(),
            AuditServiceConfig { async_writes: false },
        ));
        let access = Arc::new(AccessService::new(users.clone(), blocks.clone(), audit.clone()));

        Self {
            users,
            blocks,
            contacts,
            interactions,
            references,
            watchlist,
            audit_logs,
            audit,
            access,
            hasher,
            admin,
            curator,
            other_curator,
            viewer,
            block,
            other_block,
            status_cold,
            status_warm,
            status_retired,
            meeting_type,
            phone_channel,
            sphere,
        }
    }

    pub fn actor(&self, user: &User) -> Actor {
        Actor::new(user.id, user.role).with_origin(RequestOrigin::new(
            Some("10.0.0.7".to_string()),
            Some("Mozilla/5.0 (X11; Linux x86_64)".to_string()),
        ))
    }

    pub fn reference_service(&self) -> Arc<ReferenceService> {
        Arc::new(ReferenceService::new(
            self.references.clone(),
            self.access.clone(),
            self.audit.clone(),
        ))
    }

    pub fn user_service(&self) -> UserService {
        UserService::new(
            self.users.clone(),
            self.hasher.clone(),
            self.access.clone(),
            self.audit.clone(),
        )
    }

    pub fn block_service(&self) -> BlockService {
        BlockService::new(
            self.blocks.clone(),
            self.users.clone(),
            self.contacts.clone(),
            self.access.clone(),
            self.audit.clone(),
        )
    }

    pub fn contact_service(&self) -> Arc<ContactService> {
        Arc::new(ContactService::new(
            self.contacts.clone(),
            self.blocks.clone(),
            self.users.clone(),
            self.reference_service(),
            self.access.clone(),
            self.audit.clone(),
        ))
    }

    pub fn interaction_service(&self) -> InteractionService {
        InteractionService::new(
            self.interactions.clone(),
            self.contacts.clone(),
            self.contact_service(),
            self.reference_service(),
            self.access.clone(),
            self.audit.clone(),
        )
    }

    pub fn watchlist_service(&self) -> WatchlistService {
        WatchlistService::new(
            self.watchlist.clone(),
            self.users.clone(),
            self.reference_service(),
            self.access.clone(),
            self.audit.clone(),
        )
    }

    pub fn dashboard_service(&self) -> DashboardService {
        self.dashboard_service_with(DashboardConfig::default())
    }

    pub fn dashboard_service_with(&self, config: DashboardConfig) -> DashboardService {
        DashboardService::new(
            self.contacts.clone(),
            self.interactions.clone(),
            self.watchlist.clone(),
            self.references.clone(),
            self.access.clone(),
            config,
        )
    }

    /// A contact stored directly, bypassing the service
    pub async fn seed_contact(&self, name: &str, block: &Block) -> Contact {
        let contact = Contact::new(Self::new_contact(name, block), self.admin.id);
        self.contacts.insert(contact.clone()).await;
        contact
    }

    pub fn new_contact(name: &str, block: &Block) -> NewContact {
        NewContact {
            full_name: name.to_string(),
            position: None,
            organization: None,
            phone: None,
            email: None,
            notes: None,
            block_id: block.id,
            responsible_user_id: None,
            influence_status_id: None,
            next_touch_date: None,
        }
    }

    pub async fn audit_entries(&self) -> Vec<AuditLog> {
        self.audit_logs.get_all_logs().await
    }

    pub async fn audit_actions(&self) -> Vec<AuditAction> {
        self.audit_entries().await.iter().map(|log| log.action).collect()
    }
}
