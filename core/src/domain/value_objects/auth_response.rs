//! Authentication response value objects for API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::token::AccessToken;
use crate::domain::entities::user::{User, UserRole};

/// Public view of a user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub login: String,
    pub display_name: String,
    pub role: UserRole,
    pub mfa_enabled: bool,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            login: user.login.clone(),
            display_name: user.display_name.clone(),
            role: user.role,
            mfa_enabled: user.mfa_enabled,
            last_login_at: user.last_login_at,
        }
    }
}

/// Returned after a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

impl LoginResponse {
    pub fn new(token: AccessToken, user: &User) -> Self {
        Self {
            access_token: token.token,
            token_type: token.token_type,
            expires_in: token.expires_in,
            user: UserProfile::from(user),
        }
    }
}

/// Pending TOTP enrolment shown once to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MfaSetup {
    pub secret: String,
    pub provisioning_uri: String,
}
