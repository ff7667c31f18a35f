use serde::Deserialize;
use validator::Validate;

use kurator_core::{NewReferenceValue, ReferenceCategory, ReferenceUpdate};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReferenceRequest {
    pub category: ReferenceCategory,
    /// Upper-case identifier, unique within the category
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub label: String,
    #[serde(default)]
    pub sort_order: i32,
}

impl From<CreateReferenceRequest> for NewReferenceValue {
    fn from(request: CreateReferenceRequest) -> Self {
        NewReferenceValue {
            category: request.category,
            code: request.code,
            label: request.label,
            sort_order: request.sort_order,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateReferenceRequest {
    #[validate(length(min = 1, max = 255))]
    pub label: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<UpdateReferenceRequest> for ReferenceUpdate {
    fn from(request: UpdateReferenceRequest) -> Self {
        ReferenceUpdate {
            label: request.label,
            sort_order: request.sort_order,
            is_active: request.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceListQuery {
    pub category: Option<ReferenceCategory>,
    #[serde(default)]
    pub include_inactive: bool,
}
