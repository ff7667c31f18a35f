//! Application state and factory
//!
//! [`AppState`] wires the core services on top of a [`Repositories`] set,
//! either the MySQL implementations from `kurator_infra` or the in-memory
//! mocks in tests. [`create_app`] builds the actix-web application.

use std::sync::Arc;
use std::time::Instant;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use kurator_core::repositories::{
    AuditLogRepository, BlockRepository, ContactRepository, InteractionRepository,
    ReferenceRepository, UserRepository, WatchlistRepository,
};
use kurator_core::services::{
    AccessService, AuditService, AuditServiceConfig, AuthService, AuthServiceConfig, BlockService,
    ContactService, DashboardConfig, DashboardService, InteractionService, PasswordHasher,
    ReferenceService, TokenService, TokenServiceConfig, TotpService, UserService,
    WatchlistService,
};
use kurator_infra::{DatabasePool, MySqlRepositories};
use kurator_shared::{AppConfig, HealthResponse};
use kurator_shared::types::response::ServiceHealth;

use crate::handlers::{self, ApiError};
use crate::middleware::{create_cors, JwtAuth, SecurityMiddleware};
use crate::routes;

/// Storage backends the services are built on
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub blocks: Arc<dyn BlockRepository>,
    pub references: Arc<dyn ReferenceRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub interactions: Arc<dyn InteractionRepository>,
    pub watchlist: Arc<dyn WatchlistRepository>,
    pub audit_logs: Arc<dyn AuditLogRepository>,
}

impl From<MySqlRepositories> for Repositories {
    fn from(repos: MySqlRepositories) -> Self {
        Self {
            users: repos.users,
            blocks: repos.blocks,
            references: repos.references,
            contacts: repos.contacts,
            interactions: repos.interactions,
            watchlist: repos.watchlist,
            audit_logs: repos.audit_logs,
        }
    }
}

/// Application state that holds shared services
pub struct AppState {
    pub config: AppConfig,
    pub token_service: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub access_service: Arc<AccessService>,
    pub audit_service: Arc<AuditService>,
    pub user_service: Arc<UserService>,
    pub block_service: Arc<BlockService>,
    pub reference_service: Arc<ReferenceService>,
    pub contact_service: Arc<ContactService>,
    pub interaction_service: Arc<InteractionService>,
    pub watchlist_service: Arc<WatchlistService>,
    pub dashboard_service: Arc<DashboardService>,
    /// Probed by `/health` when present
    pub database: Option<DatabasePool>,
}

impl AppState {
    pub fn new(repos: Repositories, config: AppConfig) -> Self {
        let hasher = PasswordHasher::new(config.security.bcrypt_cost);
        let token_service = Arc::new(TokenService::new(TokenServiceConfig::from(&config.auth.jwt)));

        let audit_service = Arc::new(AuditService::new(
            repos.audit_logs.clone(),
            AuditServiceConfig::from(&config.security),
        ));
        let access_service = Arc::new(AccessService::new(
            repos.users.clone(),
            repos.blocks.clone(),
            audit_service.clone(),
        ));
        let reference_service = Arc::new(ReferenceService::new(
            repos.references.clone(),
            access_service.clone(),
            audit_service.clone(),
        ));
        let contact_service = Arc::new(ContactService::new(
            repos.contacts.clone(),
            repos.blocks.clone(),
            repos.users.clone(),
            reference_service.clone(),
            access_service.clone(),
            audit_service.clone(),
        ));
        let interaction_service = Arc::new(InteractionService::new(
            repos.interactions.clone(),
            repos.contacts.clone(),
            contact_service.clone(),
            reference_service.clone(),
            access_service.clone(),
            audit_service.clone(),
        ));
        let watchlist_service = Arc::new(WatchlistService::new(
            repos.watchlist.clone(),
            repos.users.clone(),
            reference_service.clone(),
            access_service.clone(),
            audit_service.clone(),
        ));
        let dashboard_service = Arc::new(DashboardService::new(
            repos.contacts.clone(),
            repos.interactions.clone(),
            repos.watchlist.clone(),
            repos.references.clone(),
            access_service.clone(),
            DashboardConfig::default(),
        ));
        let block_service = Arc::new(BlockService::new(
            repos.blocks.clone(),
            repos.users.clone(),
            repos.contacts.clone(),
            access_service.clone(),
            audit_service.clone(),
        ));
        let user_service = Arc::new(UserService::new(
            repos.users.clone(),
            hasher.clone(),
            access_service.clone(),
            audit_service.clone(),
        ));
        let auth_service = Arc::new(AuthService::new(
            repos.users,
            token_service.clone(),
            hasher,
            TotpService::new(config.security.totp_issuer.clone()),
            audit_service.clone(),
            AuthServiceConfig::from(&config.security),
        ));

        Self {
            config,
            token_service,
            auth_service,
            access_service,
            audit_service,
            user_service,
            block_service,
            reference_service,
            contact_service,
            interaction_service,
            watchlist_service,
            dashboard_service,
            database: None,
        }
    }

    pub fn with_database(mut self, pool: DatabasePool) -> Self {
        self.database = Some(pool);
        self
    }
}

/// Create and configure the application with all dependencies
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let config = &state.config;
    let cors = create_cors(&config.cors);
    let security = SecurityMiddleware::for_environment(config.environment);
    let jwt = JwtAuth::new(state.token_service.clone());
    let json_limit = config.server.max_payload_size;

    App::new()
        .app_data(state)
        .app_data(handlers::json_config(json_limit))
        .app_data(handlers::query_config())
        .app_data(handlers::path_config())
        // Last wrap runs first: tracing, then CORS, then security checks
        .wrap(security)
        .wrap(cors)
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        // Public; registered ahead of the protected scope
        .route(
            "/api/v1/auth/login",
            web::post().to(routes::auth::login::login),
        )
        .service(
            web::scope("/api/v1")
                .wrap(jwt)
                .configure(routes::configure),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let mut health = HealthResponse::new(env!("CARGO_PKG_VERSION"));

    if let Some(database) = &state.database {
        let started = Instant::now();
        let probe = match database.health_check().await {
            Ok(true) => ServiceHealth::healthy(started.elapsed().as_millis() as u64),
            Ok(false) => ServiceHealth::unhealthy("unexpected probe result"),
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                ServiceHealth::unhealthy("database unreachable")
            }
        };
        health = health.with_service("database", probe);
    }

    match health.status {
        kurator_shared::HealthStatus::Unhealthy => HttpResponse::ServiceUnavailable().json(health),
        _ => HttpResponse::Ok().json(health),
    }
}

/// Default 404 handler
async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::RouteNotFound)
}
