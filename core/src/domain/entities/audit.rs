//! Audit log entity for recording data changes and security events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use kurator_shared::Pagination;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Restore,
    StatusChange,
    Check,
    Login,
    LoginFailed,
    MfaEnabled,
    MfaDisabled,
    PasswordChanged,
    AccessDenied,
}

impl AuditAction {
    /// String representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Restore => "RESTORE",
            Self::StatusChange => "STATUS_CHANGE",
            Self::Check => "CHECK",
            Self::Login => "LOGIN",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::MfaEnabled => "MFA_ENABLED",
            Self::MfaDisabled => "MFA_DISABLED",
            Self::PasswordChanged => "PASSWORD_CHANGED",
            Self::AccessDenied => "ACCESS_DENIED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREATE" => Some(Self::Create),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "RESTORE" => Some(Self::Restore),
            "STATUS_CHANGE" => Some(Self::StatusChange),
            "CHECK" => Some(Self::Check),
            "LOGIN" => Some(Self::Login),
            "LOGIN_FAILED" => Some(Self::LoginFailed),
            "MFA_ENABLED" => Some(Self::MfaEnabled),
            "MFA_DISABLED" => Some(Self::MfaDisabled),
            "PASSWORD_CHANGED" => Some(Self::PasswordChanged),
            "ACCESS_DENIED" => Some(Self::AccessDenied),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntity {
    Contact,
    Interaction,
    Watchlist,
    Block,
    User,
    ReferenceValue,
    Session,
}

impl AuditEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Interaction => "interaction",
            Self::Watchlist => "watchlist",
            Self::Block => "block",
            Self::User => "user",
            Self::ReferenceValue => "reference_value",
            Self::Session => "session",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "contact" => Some(Self::Contact),
            "interaction" => Some(Self::Interaction),
            "watchlist" => Some(Self::Watchlist),
            "block" => Some(Self::Block),
            "user" => Some(Self::User),
            "reference_value" => Some(Self::ReferenceValue),
            "session" => Some(Self::Session),
            _ => None,
        }
    }
}

/// Append-only audit record. `details` carries ids, codes and changed field
/// names, never decrypted PII.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditLog {
    pub id: Uuid,
    /// Acting user, None for anonymous events such as unknown-login attempts
    pub user_id: Option<Uuid>,
    pub action: AuditAction,
    pub entity_type: AuditEntity,
    pub entity_id: Option<Uuid>,
    pub details: Option<JsonValue>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// Coarse device class derived from the user agent
    pub device_info: Option<String>,
    pub success: bool,
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(action: AuditAction, entity_type: AuditEntity) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: None,
            action,
            entity_type,
            entity_id: None,
            details: None,
            ip_address: None,
            user_agent: None,
            device_info: None,
            success: !matches!(action, AuditAction::LoginFailed | AuditAction::AccessDenied),
            created_at: Utc::now(),
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_entity(mut self, entity_id: Uuid) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    pub fn with_details(mut self, details: JsonValue) -> Self {
        self.details = Some(details);
        self
    }

    /// Add request context (IP and User Agent)
    pub fn with_request_context(
        mut self,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        self.ip_address = ip_address;
        self.device_info = user_agent.as_deref().map(Self::extract_device_info);
        self.user_agent = user_agent;
        self
    }

    pub fn failed(mut self) -> Self {
        self.success = false;
        self
    }

    /// Extract a coarse `Device/OS` description from a user agent string
    pub fn extract_device_info(user_agent: &str) -> String {
        let ua_lower = user_agent.to_lowercase();

        let device_type = if ua_lower.contains("ipad") || ua_lower.contains("tablet") {
            "Tablet"
        } else if ua_lower.contains("mobile") || ua_lower.contains("android") || ua_lower.contains("iphone") {
            "Mobile"
        } else {
            "Desktop"
        };

        let os = if ua_lower.contains("windows") {
            "Windows"
        } else if ua_lower.contains("android") {
            "Android"
        } else if ua_lower.contains("iphone") || ua_lower.contains("ipad") {
            "iOS"
        } else if ua_lower.contains("mac") {
            "macOS"
        } else if ua_lower.contains("linux") {
            "Linux"
        } else {
            "Unknown"
        };

        format!("{}/{}", device_type, os)
    }
}

/// Search parameters for the audit log
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub user_id: Option<Uuid>,
    pub entity_type: Option<AuditEntity>,
    pub entity_id: Option<Uuid>,
    pub action: Option<AuditAction>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub pagination: Pagination,
}

impl AuditFilter {
    pub fn matches(&self, log: &AuditLog) -> bool {
        self.user_id.map_or(true, |id| log.user_id == Some(id))
            && self.entity_type.map_or(true, |t| log.entity_type == t)
            && self.entity_id.map_or(true, |id| log.entity_id == Some(id))
            && self.action.map_or(true, |a| log.action == a)
            && self.from.map_or(true, |from| log.created_at >= from)
            && self.to.map_or(true, |to| log.created_at <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_sets_context() {
        let user = Uuid::new_v4();
        let entity = Uuid::new_v4();
        let log = AuditLog::new(AuditAction::Update, AuditEntity::Contact)
            .with_user(user)
            .with_entity(entity)
            .with_details(json!({ "changed_fields": ["phone"] }))
            .with_request_context(
                Some("10.0.0.5".to_string()),
                Some("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile".to_string()),
            );

        assert_eq!(log.user_id, Some(user));
        assert_eq!(log.entity_id, Some(entity));
        assert_eq!(log.device_info.as_deref(), Some("Mobile/iOS"));
        assert!(log.success);
    }

    #[test]
    fn test_failure_actions_default_to_unsuccessful() {
        assert!(!AuditLog::new(AuditAction::LoginFailed, AuditEntity::Session).success);
        assert!(!AuditLog::new(AuditAction::AccessDenied, AuditEntity::Contact).success);
        assert!(!AuditLog::new(AuditAction::Delete, AuditEntity::Block).failed().success);
    }

    #[test]
    fn test_string_codes_round_trip() {
        for action in [AuditAction::StatusChange, AuditAction::MfaDisabled, AuditAction::Check] {
            assert_eq!(AuditAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(AuditEntity::parse("reference_value"), Some(AuditEntity::ReferenceValue));
        assert_eq!(AuditEntity::parse("order"), None);
    }

    #[test]
    fn test_device_info_extraction() {
        assert_eq!(
            AuditLog::extract_device_info("Mozilla/5.0 (Windows NT 10.0; Win64; x64)"),
            "Desktop/Windows"
        );
        assert_eq!(
            AuditLog::extract_device_info("Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X)"),
            "Tablet/iOS"
        );
        assert_eq!(AuditLog::extract_device_info("curl/8.0"), "Desktop/Unknown");
    }
}
