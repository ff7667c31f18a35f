//! User accounts, roles and login lockout state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a user in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access, manages users, blocks and reference data
    Admin,
    /// Works with contacts in assigned blocks
    Curator,
    /// Read-only access to assigned blocks
    Viewer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Curator => "curator",
            UserRole::Viewer => "viewer",
        }
    }

    /// Whether the role may create or modify records
    pub fn can_write(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Curator)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "curator" => Ok(UserRole::Curator),
            "viewer" => Ok(UserRole::Viewer),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub login: String,
    pub display_name: String,

    /// bcrypt hash, never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub role: UserRole,
    pub is_active: bool,
    pub mfa_enabled: bool,

    /// Base32 TOTP secret; pending until `mfa_enabled` is set
    #[serde(skip_serializing, default)]
    pub mfa_secret: Option<String>,

    pub failed_login_attempts: u32,
    pub locked_until: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        login: impl Into<String>,
        display_name: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            login: login.into(),
            display_name: display_name.into(),
            password_hash: password_hash.into(),
            role,
            is_active: true,
            mfa_enabled: false,
            mfa_secret: None,
            failed_login_attempts: 0,
            locked_until: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.map_or(false, |until| until > now)
    }

    /// Whole minutes until the lock expires, rounded up
    pub fn lock_remaining_minutes(&self, now: DateTime<Utc>) -> i64 {
        match self.locked_until {
            Some(until) if until > now => {
                let seconds = (until - now).num_seconds();
                (seconds + 59) / 60
            }
            _ => 0,
        }
    }

    /// Count a failed login; returns true when this failure locks the account
    pub fn record_failed_login(
        &mut self,
        now: DateTime<Utc>,
        max_attempts: u32,
        lockout_minutes: i64,
    ) -> bool {
        self.failed_login_attempts += 1;
        self.updated_at = now;
        if self.failed_login_attempts >= max_attempts {
            self.locked_until = Some(now + Duration::minutes(lockout_minutes));
            self.failed_login_attempts = 0;
            return true;
        }
        false
    }

    pub fn record_successful_login(&mut self, now: DateTime<Utc>) {
        self.failed_login_attempts = 0;
        self.locked_until = None;
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    pub fn unlock(&mut self) {
        self.failed_login_attempts = 0;
        self.locked_until = None;
        self.updated_at = Utc::now();
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub display_name: String,
    pub password: String,
    pub role: UserRole,
}

/// Partial user update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}
