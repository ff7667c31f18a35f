//! Lookup values for statuses, interaction types, channels and risk spheres.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceCategory {
    InfluenceStatus,
    InteractionType,
    InteractionChannel,
    RiskSphere,
}

impl ReferenceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceCategory::InfluenceStatus => "influence_status",
            ReferenceCategory::InteractionType => "interaction_type",
            ReferenceCategory::InteractionChannel => "interaction_channel",
            ReferenceCategory::RiskSphere => "risk_sphere",
        }
    }
}

impl std::str::FromStr for ReferenceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "influence_status" => Ok(ReferenceCategory::InfluenceStatus),
            "interaction_type" => Ok(ReferenceCategory::InteractionType),
            "interaction_channel" => Ok(ReferenceCategory::InteractionChannel),
            "risk_sphere" => Ok(ReferenceCategory::RiskSphere),
            other => Err(format!("Unknown reference category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceValue {
    pub id: Uuid,
    pub category: ReferenceCategory,
    /// Stable machine code, unique within the category
    pub code: String,
    pub label: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReferenceValue {
    pub fn new(
        category: ReferenceCategory,
        code: impl Into<String>,
        label: impl Into<String>,
        sort_order: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            category,
            code: code.into(),
            label: label.into(),
            sort_order,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewReferenceValue {
    pub category: ReferenceCategory,
    pub code: String,
    pub label: String,
    pub sort_order: i32,
}

/// The code is immutable once created
#[derive(Debug, Clone, Default)]
pub struct ReferenceUpdate {
    pub label: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}
