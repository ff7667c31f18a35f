use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use kurator_core::{ContactFilter, ContactUpdate, NewContact};

use super::common::{double_option, pagination};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContactRequest {
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    #[validate(length(max = 255))]
    pub position: Option<String>,
    #[validate(length(max = 255))]
    pub organization: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 254))]
    pub email: Option<String>,
    #[validate(length(max = 10000))]
    pub notes: Option<String>,
    pub block_id: Uuid,
    pub responsible_user_id: Option<Uuid>,
    pub influence_status_id: Option<Uuid>,
    pub next_touch_date: Option<NaiveDate>,
}

impl From<CreateContactRequest> for NewContact {
    fn from(request: CreateContactRequest) -> Self {
        NewContact {
            full_name: request.full_name,
            position: request.position,
            organization: request.organization,
            phone: request.phone,
            email: request.email,
            notes: request.notes,
            block_id: request.block_id,
            responsible_user_id: request.responsible_user_id,
            influence_status_id: request.influence_status_id,
            next_touch_date: request.next_touch_date,
        }
    }
}

/// Partial update; `null` clears an optional field, absent leaves it alone
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateContactRequest {
    #[validate(length(min = 1, max = 255))]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub position: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub organization: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    pub block_id: Option<Uuid>,
    #[serde(default, deserialize_with = "double_option")]
    pub responsible_user_id: Option<Option<Uuid>>,
    /// Status changes through this endpoint are recorded in the history
    pub influence_status_id: Option<Uuid>,
    #[serde(default, deserialize_with = "double_option")]
    pub next_touch_date: Option<Option<NaiveDate>>,
}

impl From<UpdateContactRequest> for ContactUpdate {
    fn from(request: UpdateContactRequest) -> Self {
        ContactUpdate {
            full_name: request.full_name,
            position: request.position,
            organization: request.organization,
            phone: request.phone,
            email: request.email,
            notes: request.notes,
            block_id: request.block_id,
            responsible_user_id: request.responsible_user_id,
            influence_status_id: request.influence_status_id,
            next_touch_date: request.next_touch_date,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeStatusRequest {
    pub status_id: Uuid,
    #[validate(length(max = 10000))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactListQuery {
    pub block_id: Option<Uuid>,
    pub status_id: Option<Uuid>,
    pub responsible_user_id: Option<Uuid>,
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl From<ContactListQuery> for ContactFilter {
    fn from(query: ContactListQuery) -> Self {
        ContactFilter {
            block_id: query.block_id,
            status_id: query.status_id,
            responsible_user_id: query.responsible_user_id,
            search: query.search.filter(|s| !s.trim().is_empty()),
            include_inactive: query.include_inactive,
            pagination: pagination(query.page, query.per_page),
        }
    }
}
