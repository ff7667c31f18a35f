//! Shared fixtures for the API integration tests: an `AppState` backed by
//! the in-memory repositories and a few seeded users.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use serde_json::Value;
use uuid::Uuid;

use kurator_api::{AppState, Repositories};
use kurator_core::repositories::{
    MockAuditLogRepository, MockBlockRepository, MockContactRepository,
    MockInteractionRepository, MockReferenceRepository, MockUserRepository,
    MockWatchlistRepository,
};
use kurator_core::{Block, PasswordHasher, ReferenceCategory, ReferenceValue, User, UserRole};
use kurator_shared::AppConfig;

pub const PASSWORD: &str = "Kurator2024";

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub audit_logs: Arc<MockAuditLogRepository>,
    pub admin: User,
    pub curator: User,
    pub viewer: User,
    pub block: Block,
    pub other_block: Block,
    pub status_active: ReferenceValue,
    pub status_neutral: ReferenceValue,
}

impl TestContext {
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.security.bcrypt_cost = 4;

        let hasher = PasswordHasher::new(4);
        let hash = hasher.hash(PASSWORD).unwrap();

        let users = Arc::new(MockUserRepository::new());
        let admin = User::new("admin", "Administrator", hash.clone(), UserRole::Admin);
        let curator = User::new("i.petrova", "Irina Petrova", hash.clone(), UserRole::Curator);
        let viewer = User::new("a.smirnov", "Alexei Smirnov", hash, UserRole::Viewer);
        users.insert(admin.clone()).await;
        users.insert(curator.clone()).await;
        users.insert(viewer.clone()).await;

        let blocks = Arc::new(MockBlockRepository::new());
        let mut block = Block::new("Regional administration", None);
        block.assign_curators(vec![curator.id, viewer.id]);
        let other_block = Block::new("Business community", None);
        blocks.insert(block.clone()).await;
        blocks.insert(other_block.clone()).await;

        let references = Arc::new(MockReferenceRepository::new());
        let status_active = ReferenceValue::new(
            ReferenceCategory::InfluenceStatus,
            "ACTIVE",
            "Active supporter",
            1,
        );
        let status_neutral =
            ReferenceValue::new(ReferenceCategory::InfluenceStatus, "NEUTRAL", "Neutral", 2);
        references.insert(status_active.clone()).await;
        references.insert(status_neutral.clone()).await;

        let audit_logs = Arc::new(MockAuditLogRepository::new());

        let repos = Repositories {
            users,
            blocks,
            references,
            contacts: Arc::new(MockContactRepository::new()),
            interactions: Arc::new(MockInteractionRepository::new()),
            watchlist: Arc::new(MockWatchlistRepository::new()),
            audit_logs: audit_logs.clone(),
        };

        Self {
            state: web::Data::new(AppState::new(repos, config)),
            audit_logs,
            admin,
            curator,
            viewer,
            block,
            other_block,
            status_active,
            status_neutral,
        }
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state.token_service.issue(user).unwrap().token
    }

    pub fn bearer(&self, user: &User) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token_for(user)))
    }
}

/// Extract `data.id` from a wrapped success body
pub fn data_id(body: &Value) -> Uuid {
    body["data"]["id"].as_str().unwrap().parse().unwrap()
}
