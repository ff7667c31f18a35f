use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use kurator_core::{MonitoringFrequency, NewWatchlistEntry, RiskLevel, WatchlistFilter, WatchlistUpdate};

use super::common::{double_option, pagination};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWatchlistRequest {
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    pub sphere_id: Option<Uuid>,
    pub risk_level: RiskLevel,
    pub monitoring_frequency: MonitoringFrequency,
    #[validate(length(max = 255))]
    pub source: Option<String>,
    #[validate(length(max = 10000))]
    pub notes: Option<String>,
    /// Defaults to the caller
    pub owner_id: Option<Uuid>,
    /// Defaults to one period from today
    pub next_check_date: Option<NaiveDate>,
}

impl From<CreateWatchlistRequest> for NewWatchlistEntry {
    fn from(request: CreateWatchlistRequest) -> Self {
        NewWatchlistEntry {
            full_name: request.full_name,
            sphere_id: request.sphere_id,
            risk_level: request.risk_level,
            monitoring_frequency: request.monitoring_frequency,
            source: request.source,
            notes: request.notes,
            owner_id: request.owner_id,
            next_check_date: request.next_check_date,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWatchlistRequest {
    #[validate(length(min = 1, max = 255))]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub sphere_id: Option<Option<Uuid>>,
    pub risk_level: Option<RiskLevel>,
    pub monitoring_frequency: Option<MonitoringFrequency>,
    #[serde(default, deserialize_with = "double_option")]
    pub source: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    pub owner_id: Option<Uuid>,
    pub next_check_date: Option<NaiveDate>,
}

impl From<UpdateWatchlistRequest> for WatchlistUpdate {
    fn from(request: UpdateWatchlistRequest) -> Self {
        WatchlistUpdate {
            full_name: request.full_name,
            sphere_id: request.sphere_id,
            risk_level: request.risk_level,
            monitoring_frequency: request.monitoring_frequency,
            source: request.source,
            notes: request.notes,
            owner_id: request.owner_id,
            next_check_date: request.next_check_date,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MarkCheckedRequest {
    /// Appended to the entry's notes with the check date
    #[validate(length(max = 10000))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchlistListQuery {
    pub risk_level: Option<RiskLevel>,
    pub sphere_id: Option<Uuid>,
    pub due_on: Option<NaiveDate>,
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl From<WatchlistListQuery> for WatchlistFilter {
    fn from(query: WatchlistListQuery) -> Self {
        WatchlistFilter {
            risk_level: query.risk_level,
            sphere_id: query.sphere_id,
            due_on: query.due_on,
            search: query.search.filter(|s| !s.trim().is_empty()),
            include_inactive: query.include_inactive,
            pagination: pagination(query.page, query.per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_parses_enums() {
        let request: CreateWatchlistRequest = serde_json::from_str(
            r#"{"full_name": "Viktor Sokolov", "risk_level": "high", "monitoring_frequency": "weekly"}"#,
        )
        .unwrap();
        assert_eq!(request.risk_level, RiskLevel::High);
        assert_eq!(request.monitoring_frequency, MonitoringFrequency::Weekly);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_unknown_risk_level_is_rejected() {
        let result: Result<CreateWatchlistRequest, _> = serde_json::from_str(
            r#"{"full_name": "Viktor Sokolov", "risk_level": "extreme", "monitoring_frequency": "weekly"}"#,
        );
        assert!(result.is_err());
    }
}
