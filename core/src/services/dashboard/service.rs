use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::contact::Contact;
use crate::domain::entities::reference::ReferenceCategory;
use crate::domain::entities::watchlist::RiskLevel;
use crate::domain::value_objects::actor::Actor;
use crate::errors::DomainResult;
use crate::repositories::{
    ContactQuery, ContactRepository, InteractionRepository, ReferenceRepository,
    WatchlistRepository,
};
use crate::services::access::AccessService;

use super::config::DashboardConfig;

const UNASSIGNED_LABEL: &str = "Unassigned";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    /// None for contacts without a status
    pub status_id: Option<Uuid>,
    pub code: Option<String>,
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskCount {
    pub risk_level: RiskLevel,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchlistSummary {
    pub total: u64,
    pub due: u64,
    pub by_risk: Vec<RiskCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentInteraction {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub contact_name: String,
    pub author_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub interaction_type_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_contacts: u64,
    pub by_status: Vec<StatusCount>,
    pub overdue_touches: u64,
    pub stale_contacts: u64,
    pub my_contacts: u64,
    pub recent_activity_count: u64,
    pub watchlist: WatchlistSummary,
    pub recent_interactions: Vec<RecentInteraction>,
}

pub struct DashboardService {
    contacts: Arc<dyn ContactRepository>,
    interactions: Arc<dyn InteractionRepository>,
    watchlist: Arc<dyn WatchlistRepository>,
    references: Arc<dyn ReferenceRepository>,
    access: Arc<AccessService>,
    config: DashboardConfig,
}

impl DashboardService {
    pub fn new(
        contacts: Arc<dyn ContactRepository>,
        interactions: Arc<dyn InteractionRepository>,
        watchlist: Arc<dyn WatchlistRepository>,
        references: Arc<dyn ReferenceRepository>,
        access: Arc<AccessService>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            contacts,
            interactions,
            watchlist,
            references,
            access,
            config,
        }
    }

    /// Summary of the contacts visible to the caller plus the shared watchlist
    pub async fn summary(&self, actor: &Actor, today: NaiveDate) -> DomainResult<DashboardSummary> {
        let access = self.access.authorize(actor).await?;

        let contacts = self
            .contacts
            .list(&ContactQuery::scoped(access.scope.clone()))
            .await?;
        let stale_cutoff = today - Duration::days(self.config.stale_after_days);
        let overdue_touches = contacts.iter().filter(|c| c.is_touch_overdue(today)).count();
        let stale_contacts = contacts
            .iter()
            .filter(|c| is_stale(c, stale_cutoff))
            .count();
        let my_contacts = contacts
            .iter()
            .filter(|c| c.responsible_user_id == Some(access.user_id))
            .count();
        let by_status = self.count_by_status(&contacts).await?;

        let ids: Vec<Uuid> = contacts.iter().map(|c| c.id).collect();
        let window_start = start_of_day(today - Duration::days(self.config.activity_window_days));
        let recent_activity_count = self
            .interactions
            .count_for_contacts(&ids, Some(window_start))
            .await?;
        let recent_limit = u32::try_from(self.config.recent_limit).unwrap_or(u32::MAX);
        let interactions = self
            .interactions
            .list_for_contacts(&ids, None, Some(recent_limit))
            .await?;
        let names: HashMap<Uuid, &str> = contacts
            .iter()
            .map(|c| (c.id, c.full_name.as_str()))
            .collect();
        let recent_interactions = interactions
            .iter()
            .map(|i| RecentInteraction {
                id: i.id,
                contact_id: i.contact_id,
                contact_name: names.get(&i.contact_id).copied().unwrap_or_default().to_string(),
                author_id: i.author_id,
                occurred_at: i.occurred_at,
                interaction_type_id: i.interaction_type_id,
            })
            .collect();

        let entries = self.watchlist.list(false).await?;
        let watchlist = WatchlistSummary {
            total: entries.len() as u64,
            due: entries.iter().filter(|e| e.is_due(today)).count() as u64,
            by_risk: RiskLevel::ALL
                .iter()
                .map(|level| RiskCount {
                    risk_level: *level,
                    count: entries.iter().filter(|e| e.risk_level == *level).count() as u64,
                })
                .collect(),
        };

        Ok(DashboardSummary {
            total_contacts: contacts.len() as u64,
            by_status,
            overdue_touches: overdue_touches as u64,
            stale_contacts: stale_contacts as u64,
            my_contacts: my_contacts as u64,
            recent_activity_count,
            watchlist,
            recent_interactions,
        })
    }

    /// One bucket per status in reference order, then the unassigned bucket.
    /// Statuses nobody holds are left out.
    async fn count_by_status(&self, contacts: &[Contact]) -> DomainResult<Vec<StatusCount>> {
        let mut counts: HashMap<Option<Uuid>, u64> = HashMap::new();
        for contact in contacts {
            *counts.entry(contact.influence_status_id).or_default() += 1;
        }

        let statuses = self
            .references
            .list(Some(ReferenceCategory::InfluenceStatus), false)
            .await?;
        let mut buckets = Vec::new();
        for status in statuses {
            if let Some(count) = counts.remove(&Some(status.id)) {
                buckets.push(StatusCount {
                    status_id: Some(status.id),
                    code: Some(status.code),
                    label: status.label,
                    count,
                });
            }
        }
        // Unknown or retired statuses are counted as unassigned
        let unassigned: u64 = counts.values().sum();
        if unassigned > 0 {
            buckets.push(StatusCount {
                status_id: None,
                code: None,
                label: UNASSIGNED_LABEL.to_string(),
                count: unassigned,
            });
        }
        Ok(buckets)
    }
}

fn is_stale(contact: &Contact, cutoff: NaiveDate) -> bool {
    let last_seen = contact.last_interaction_at.unwrap_or(contact.created_at);
    last_seen.date_naive() < cutoff
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| Utc.from_utc_datetime(&dt))
        .unwrap_or_else(Utc::now)
}
