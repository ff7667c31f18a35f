//! Main authentication service implementation

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::audit::{AuditAction, AuditEntity, AuditLog};
use crate::domain::entities::user::User;
use crate::domain::value_objects::actor::{Actor, RequestOrigin};
use crate::domain::value_objects::auth_response::{LoginResponse, MfaSetup, UserProfile};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::audit::AuditService;
use crate::services::encryption::{PasswordHasher, TotpService};
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;

/// Authentication service for login and account self-service
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    totp: TotpService,
    audit: Arc<AuditService>,
    config: AuthServiceConfig,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        totp: TotpService,
        audit: Arc<AuditService>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
            totp,
            audit,
            config,
        }
    }

    /// Password login with optional second factor.
    ///
    /// Unknown login, wrong password and inactive account all return
    /// `InvalidCredentials`. A wrong TOTP code counts as a failed attempt.
    pub async fn login(
        &self,
        login: &str,
        password: &str,
        totp_code: Option<&str>,
        origin: RequestOrigin,
    ) -> DomainResult<LoginResponse> {
        let now = Utc::now();

        let mut user = match self.users.find_by_login(login.trim()).await? {
            Some(user) if user.is_active => user,
            Some(user) => {
                self.record_failure(Some(&user), "inactive", &origin).await?;
                return Err(AuthError::InvalidCredentials.into());
            }
            None => {
                self.record_failure(None, "unknown_login", &origin).await?;
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if user.is_locked(now) {
            self.record_failure(Some(&user), "locked", &origin).await?;
            return Err(AuthError::AccountLocked {
                minutes: user.lock_remaining_minutes(now),
            }
            .into());
        }

        if !self.hasher.verify(password, &user.password_hash) {
            self.count_failure(&mut user, "bad_password", &origin).await?;
            return Err(AuthError::InvalidCredentials.into());
        }

        if user.mfa_enabled {
            let code = match totp_code.map(str::trim) {
                Some(code) if !code.is_empty() => code,
                _ => return Err(AuthError::MfaRequired.into()),
            };
            let secret = user
                .mfa_secret
                .clone()
                .ok_or_else(|| DomainError::internal("MFA enabled without a secret"))?;
            if !self.totp.verify(&secret, code, now.timestamp())? {
                self.count_failure(&mut user, "bad_mfa_code", &origin).await?;
                return Err(AuthError::InvalidMfaCode.into());
            }
        }

        user.record_successful_login(now);
        let user = self.users.update(user).await?;
        let token = self.tokens.issue(&user)?;

        self.audit
            .record(
                AuditLog::new(AuditAction::Login, AuditEntity::Session)
                    .with_user(user.id)
                    .with_request_context(origin.ip_address, origin.user_agent),
            )
            .await?;
        info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse::new(token, &user))
    }

    pub async fn profile(&self, actor: &Actor) -> DomainResult<UserProfile> {
        let user = self.current_user(actor).await?;
        Ok(UserProfile::from(&user))
    }

    /// Generate a pending TOTP secret. It only takes effect once a code
    /// generated from it is confirmed.
    pub async fn begin_mfa_setup(&self, actor: &Actor) -> DomainResult<MfaSetup> {
        let mut user = self.current_user(actor).await?;
        if user.mfa_enabled {
            return Err(AuthError::MfaAlreadyEnabled.into());
        }

        let secret = self.totp.generate_secret();
        let provisioning_uri = self.totp.provisioning_uri(&secret, &user.login);
        user.mfa_secret = Some(secret.clone());
        user.updated_at = Utc::now();
        let user = self.users.update(user).await?;

        self.audit
            .record(
                self.entry(actor, AuditAction::Update, &user)
                    .with_details(json!({ "mfa": "setup_started" })),
            )
            .await?;
        Ok(MfaSetup {
            secret,
            provisioning_uri,
        })
    }

    pub async fn confirm_mfa(&self, actor: &Actor, code: &str) -> DomainResult<UserProfile> {
        let mut user = self.current_user(actor).await?;
        if user.mfa_enabled {
            return Err(AuthError::MfaAlreadyEnabled.into());
        }
        let secret = user
            .mfa_secret
            .clone()
            .ok_or(AuthError::MfaSetupNotStarted)?;
        self.verify_account_code(&mut user, &secret, code, &actor.origin)
            .await?;

        user.mfa_enabled = true;
        user.updated_at = Utc::now();
        let user = self.users.update(user).await?;

        self.audit
            .record(self.entry(actor, AuditAction::MfaEnabled, &user))
            .await?;
        info!(user_id = %user.id, "Two-factor authentication enabled");
        Ok(UserProfile::from(&user))
    }

    /// Requires a current code so a stolen session alone cannot remove MFA
    pub async fn disable_mfa(&self, actor: &Actor, code: &str) -> DomainResult<UserProfile> {
        let mut user = self.current_user(actor).await?;
        let secret = match (&user.mfa_secret, user.mfa_enabled) {
            (Some(secret), true) => secret.clone(),
            _ => return Err(AuthError::MfaNotEnabled.into()),
        };
        self.verify_account_code(&mut user, &secret, code, &actor.origin)
            .await?;

        user.mfa_enabled = false;
        user.mfa_secret = None;
        user.updated_at = Utc::now();
        let user = self.users.update(user).await?;

        self.audit
            .record(self.entry(actor, AuditAction::MfaDisabled, &user))
            .await?;
        info!(user_id = %user.id, "Two-factor authentication disabled");
        Ok(UserProfile::from(&user))
    }

    pub async fn change_password(
        &self,
        actor: &Actor,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let mut user = self.current_user(actor).await?;
        if !self.hasher.verify(current_password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }
        if current_password == new_password {
            return Err(DomainError::rule("new password must differ from the current one"));
        }

        user.set_password_hash(self.hasher.hash(new_password)?);
        let user = self.users.update(user).await?;

        self.audit
            .record(self.entry(actor, AuditAction::PasswordChanged, &user))
            .await
    }

    async fn current_user(&self, actor: &Actor) -> DomainResult<User> {
        match self.users.find_by_id(actor.user_id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(DomainError::Unauthorized),
        }
    }

    fn entry(&self, actor: &Actor, action: AuditAction, user: &User) -> AuditLog {
        AuditLog::new(action, AuditEntity::User)
            .with_user(actor.user_id)
            .with_entity(user.id)
            .with_request_context(
                actor.origin.ip_address.clone(),
                actor.origin.user_agent.clone(),
            )
    }

    /// Check a TOTP code for an MFA change. Wrong codes count against the
    /// account the same way failed logins do.
    async fn verify_account_code(
        &self,
        user: &mut User,
        secret: &str,
        code: &str,
        origin: &RequestOrigin,
    ) -> DomainResult<()> {
        let now = Utc::now();
        if user.is_locked(now) {
            self.record_failure(Some(user), "locked", origin).await?;
            return Err(AuthError::AccountLocked {
                minutes: user.lock_remaining_minutes(now),
            }
            .into());
        }
        if !self.totp.verify(secret, code, now.timestamp())? {
            self.count_failure(user, "bad_mfa_code", origin).await?;
            return Err(AuthError::InvalidMfaCode.into());
        }
        Ok(())
    }

    /// Count a failure against the account, locking it at the threshold
    async fn count_failure(
        &self,
        user: &mut User,
        reason: &str,
        origin: &RequestOrigin,
    ) -> DomainResult<()> {
        let locked = user.record_failed_login(
            Utc::now(),
            self.config.max_failed_attempts,
            self.config.lockout_minutes,
        );
        *user = self.users.update(user.clone()).await?;
        if locked {
            warn!(
                user_id = %user.id,
                lockout_minutes = self.config.lockout_minutes,
                "Account locked after repeated failed attempts"
            );
        }
        self.record_failure(Some(user), reason, origin).await
    }

    async fn record_failure(
        &self,
        user: Option<&User>,
        reason: &str,
        origin: &RequestOrigin,
    ) -> DomainResult<()> {
        let mut entry = AuditLog::new(AuditAction::LoginFailed, AuditEntity::Session)
            .with_details(json!({ "reason": reason }))
            .with_request_context(origin.ip_address.clone(), origin.user_agent.clone());
        if let Some(user) = user {
            entry = entry.with_user(user.id);
        }
        self.audit.record(entry).await
    }
}
