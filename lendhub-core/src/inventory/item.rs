use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::slugify::slugify;

/// Lifecycle state of an inventory item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Available,
    OnLoan,
    Maintenance,
    Retired,
}

/// A single lendable asset, owned by exactly one location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema, utoipa::ToResponse)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub location_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn new(name: &str, location_id: &str, category: Option<String>) -> Self {
        let now = Utc::now();
        Item {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slugify(name),
            location_id: location_id.to_string(),
            category,
            status: ItemStatus::Available,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: ItemStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn is_available(&self) -> bool {
        self.status == ItemStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_is_available() {
        let item = Item::new("Bosch Drill PBH 2100", "loc-1", Some("tools".to_string()));
        assert!(item.is_available());
        assert_eq!(item.slug, "bosch-drill-pbh-2100");
        assert_eq!(item.location_id, "loc-1");
    }

    #[test]
    fn test_status_change_touches_updated_at() {
        let mut item = Item::new("Projector", "loc-1", None);
        let before = item.updated_at;
        item.set_status(ItemStatus::Maintenance);
        assert_eq!(item.status, ItemStatus::Maintenance);
        assert!(item.updated_at >= before);
    }
}
