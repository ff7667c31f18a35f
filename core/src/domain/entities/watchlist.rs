//! Watchlist of risk entities with periodic checks.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kurator_shared::Pagination;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Critical,
        RiskLevel::High,
        RiskLevel::Medium,
        RiskLevel::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// Sort key, most severe first
    pub fn priority(&self) -> u8 {
        match self {
            RiskLevel::Critical => 0,
            RiskLevel::High => 1,
            RiskLevel::Medium => 2,
            RiskLevel::Low => 3,
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "critical" => Ok(RiskLevel::Critical),
            other => Err(format!("Unknown risk level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitoringFrequency {
    Weekly,
    Monthly,
    Quarterly,
    SemiAnnually,
    Annually,
}

impl MonitoringFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonitoringFrequency::Weekly => "weekly",
            MonitoringFrequency::Monthly => "monthly",
            MonitoringFrequency::Quarterly => "quarterly",
            MonitoringFrequency::SemiAnnually => "semi_annually",
            MonitoringFrequency::Annually => "annually",
        }
    }

    /// Next check date. Month arithmetic clamps to the last day of the month.
    pub fn next_after(&self, date: NaiveDate) -> NaiveDate {
        let months = match self {
            MonitoringFrequency::Weekly => return date + Duration::days(7),
            MonitoringFrequency::Monthly => 1,
            MonitoringFrequency::Quarterly => 3,
            MonitoringFrequency::SemiAnnually => 6,
            MonitoringFrequency::Annually => 12,
        };
        date.checked_add_months(Months::new(months))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl std::str::FromStr for MonitoringFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(MonitoringFrequency::Weekly),
            "monthly" => Ok(MonitoringFrequency::Monthly),
            "quarterly" => Ok(MonitoringFrequency::Quarterly),
            "semi_annually" => Ok(MonitoringFrequency::SemiAnnually),
            "annually" => Ok(MonitoringFrequency::Annually),
            other => Err(format!("Unknown monitoring frequency: {}", other)),
        }
    }
}

/// Watchlist entry. `full_name` and `notes` are PII.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: Uuid,
    pub full_name: String,
    pub sphere_id: Option<Uuid>,
    pub risk_level: RiskLevel,
    pub monitoring_frequency: MonitoringFrequency,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub owner_id: Uuid,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub next_check_date: NaiveDate,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WatchlistEntry {
    pub fn new(input: NewWatchlistEntry, created_by: Uuid, today: NaiveDate) -> Self {
        let now = Utc::now();
        let next_check_date = input
            .next_check_date
            .unwrap_or_else(|| input.monitoring_frequency.next_after(today));
        Self {
            id: Uuid::new_v4(),
            full_name: input.full_name.trim().to_string(),
            sphere_id: input.sphere_id,
            risk_level: input.risk_level,
            monitoring_frequency: input.monitoring_frequency,
            source: input.source,
            notes: input.notes,
            owner_id: input.owner_id.unwrap_or(created_by),
            last_checked_at: None,
            next_check_date,
            is_active: true,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.is_active && self.next_check_date <= today
    }

    pub fn mark_checked(&mut self, now: DateTime<Utc>) {
        self.last_checked_at = Some(now);
        self.next_check_date = self.monitoring_frequency.next_after(now.date_naive());
        self.updated_at = now;
    }

    pub fn apply_update(&mut self, update: &WatchlistUpdate, today: NaiveDate) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if let Some(name) = &update.full_name {
            let name = name.trim();
            if self.full_name != name {
                self.full_name = name.to_string();
                changed.push("full_name");
            }
        }
        if let Some(sphere) = update.sphere_id {
            if self.sphere_id != sphere {
                self.sphere_id = sphere;
                changed.push("sphere_id");
            }
        }
        if let Some(level) = update.risk_level {
            if self.risk_level != level {
                self.risk_level = level;
                changed.push("risk_level");
            }
        }
        if let Some(source) = &update.source {
            if &self.source != source {
                self.source = source.clone();
                changed.push("source");
            }
        }
        if let Some(notes) = &update.notes {
            if &self.notes != notes {
                self.notes = notes.clone();
                changed.push("notes");
            }
        }
        if let Some(owner) = update.owner_id {
            if self.owner_id != owner {
                self.owner_id = owner;
                changed.push("owner_id");
            }
        }
        if let Some(frequency) = update.monitoring_frequency {
            if self.monitoring_frequency != frequency {
                self.monitoring_frequency = frequency;
                let base = self.last_checked_at.map_or(today, |at| at.date_naive());
                self.next_check_date = frequency.next_after(base);
                changed.push("monitoring_frequency");
            }
        }
        if let Some(date) = update.next_check_date {
            if self.next_check_date != date {
                self.next_check_date = date;
                changed.push("next_check_date");
            }
        }
        if !changed.is_empty() {
            self.updated_at = Utc::now();
        }
        changed
    }
}

#[derive(Debug, Clone)]
pub struct NewWatchlistEntry {
    pub full_name: String,
    pub sphere_id: Option<Uuid>,
    pub risk_level: RiskLevel,
    pub monitoring_frequency: MonitoringFrequency,
    pub source: Option<String>,
    pub notes: Option<String>,
    /// Defaults to the creating user
    pub owner_id: Option<Uuid>,
    /// Defaults to `monitoring_frequency.next_after(today)`
    pub next_check_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct WatchlistUpdate {
    pub full_name: Option<String>,
    pub sphere_id: Option<Option<Uuid>>,
    pub risk_level: Option<RiskLevel>,
    pub monitoring_frequency: Option<MonitoringFrequency>,
    pub source: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub owner_id: Option<Uuid>,
    pub next_check_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct WatchlistFilter {
    pub risk_level: Option<RiskLevel>,
    pub sphere_id: Option<Uuid>,
    /// Only entries due on or before this date
    pub due_on: Option<NaiveDate>,
    /// Case-insensitive substring over name and source
    pub search: Option<String>,
    pub include_inactive: bool,
    pub pagination: Pagination,
}

impl WatchlistFilter {
    pub fn matches(&self, entry: &WatchlistEntry) -> bool {
        if !self.include_inactive && !entry.is_active {
            return false;
        }
        if self.risk_level.map_or(false, |level| entry.risk_level != level) {
            return false;
        }
        if self.sphere_id.is_some() && entry.sphere_id != self.sphere_id {
            return false;
        }
        if self.due_on.map_or(false, |day| entry.next_check_date > day) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                entry.full_name.to_lowercase().contains(&needle)
                    || entry
                        .source
                        .as_deref()
                        .map_or(false, |s| s.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(frequency: MonitoringFrequency) -> WatchlistEntry {
        WatchlistEntry::new(
            NewWatchlistEntry {
                full_name: "Orion Holdings".to_string(),
                sphere_id: None,
                risk_level: RiskLevel::High,
                monitoring_frequency: frequency,
                source: Some("press".to_string()),
                notes: None,
                owner_id: None,
                next_check_date: None,
            },
            Uuid::new_v4(),
            date(2024, 1, 31),
        )
    }

    #[test]
    fn test_next_after_each_frequency() {
        let d = date(2024, 1, 31);
        assert_eq!(MonitoringFrequency::Weekly.next_after(d), date(2024, 2, 7));
        assert_eq!(MonitoringFrequency::Monthly.next_after(d), date(2024, 2, 29));
        assert_eq!(MonitoringFrequency::Quarterly.next_after(d), date(2024, 4, 30));
        assert_eq!(MonitoringFrequency::SemiAnnually.next_after(d), date(2024, 7, 31));
        assert_eq!(MonitoringFrequency::Annually.next_after(d), date(2025, 1, 31));
    }

    #[test]
    fn test_new_entry_defaults() {
        let e = entry(MonitoringFrequency::Monthly);
        assert_eq!(e.next_check_date, date(2024, 2, 29));
        assert_eq!(e.owner_id, e.created_by);
        assert!(e.is_due(date(2024, 2, 29)));
        assert!(!e.is_due(date(2024, 2, 28)));
    }

    #[test]
    fn test_frequency_change_recomputes_from_today_without_checks() {
        let mut e = entry(MonitoringFrequency::Monthly);
        let changed = e.apply_update(
            &WatchlistUpdate {
                monitoring_frequency: Some(MonitoringFrequency::Weekly),
                ..Default::default()
            },
            date(2024, 3, 1),
        );
        assert_eq!(changed, vec!["monitoring_frequency"]);
        assert_eq!(e.next_check_date, date(2024, 3, 8));
    }

    #[test]
    fn test_risk_priority_orders_critical_first() {
        let mut levels = vec![RiskLevel::Low, RiskLevel::Critical, RiskLevel::Medium, RiskLevel::High];
        levels.sort_by_key(|l| l.priority());
        assert_eq!(levels, RiskLevel::ALL.to_vec());
    }

    #[test]
    fn test_filter_matches() {
        let e = entry(MonitoringFrequency::Monthly);
        let filter = WatchlistFilter {
            search: Some("PRESS".to_string()),
            risk_level: Some(RiskLevel::High),
            ..Default::default()
        };
        assert!(filter.matches(&e));

        let filter = WatchlistFilter {
            due_on: Some(date(2024, 2, 1)),
            ..Default::default()
        };
        assert!(!filter.matches(&e));
    }
}
