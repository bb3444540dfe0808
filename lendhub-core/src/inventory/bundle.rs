use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::slugify::slugify;

/// A named set of items lent out together, all from the same location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema, utoipa::ToResponse)]
pub struct Bundle {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub location_id: String,
    pub item_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Bundle {
    pub fn new(name: &str, location_id: &str, item_ids: Vec<Uuid>) -> Self {
        Bundle {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slugify(name),
            location_id: location_id.to_string(),
            item_ids,
            created_at: Utc::now(),
        }
    }
}
