use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use kurator_core::{InteractionUpdate, NewInteraction};

use super::common::double_option;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInteractionRequest {
    pub contact_id: Uuid,
    /// Defaults to now; may not lie in the future
    pub occurred_at: Option<DateTime<Utc>>,
    pub interaction_type_id: Option<Uuid>,
    pub channel_id: Option<Uuid>,
    #[validate(length(max = 10000))]
    pub comment: Option<String>,
    /// Moves the contact to this influence status as part of the interaction
    pub new_status_id: Option<Uuid>,
    #[validate(length(max = 10000))]
    pub status_reason: Option<String>,
    pub next_touch_date: Option<NaiveDate>,
}

impl From<CreateInteractionRequest> for NewInteraction {
    fn from(request: CreateInteractionRequest) -> Self {
        NewInteraction {
            contact_id: request.contact_id,
            occurred_at: request.occurred_at,
            interaction_type_id: request.interaction_type_id,
            channel_id: request.channel_id,
            comment: request.comment,
            new_status_id: request.new_status_id,
            status_reason: request.status_reason,
            next_touch_date: request.next_touch_date,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateInteractionRequest {
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    pub interaction_type_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub channel_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub comment: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub next_touch_date: Option<Option<NaiveDate>>,
}

impl From<UpdateInteractionRequest> for InteractionUpdate {
    fn from(request: UpdateInteractionRequest) -> Self {
        InteractionUpdate {
            occurred_at: request.occurred_at,
            interaction_type_id: request.interaction_type_id,
            channel_id: request.channel_id,
            comment: request.comment,
            next_touch_date: request.next_touch_date,
        }
    }
}
