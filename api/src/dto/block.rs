use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use kurator_core::{BlockUpdate, NewBlock};

use super::common::double_option;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBlockRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl From<CreateBlockRequest> for NewBlock {
    fn from(request: CreateBlockRequest) -> Self {
        NewBlock {
            name: request.name,
            description: request.description,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBlockRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl From<UpdateBlockRequest> for BlockUpdate {
    fn from(request: UpdateBlockRequest) -> Self {
        BlockUpdate {
            name: request.name,
            description: request.description,
        }
    }
}

/// Replaces the block's curator set
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignCuratorsRequest {
    #[validate(length(max = 100))]
    pub user_ids: Vec<Uuid>,
}
