use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

use super::location::{Location, OpeningHours};

#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema, utoipa::ToResponse)]
pub struct LocationVec {
    pub locations: Vec<Location>,
}

/// Shared, concurrency-safe location registry, keyed by location slug
#[derive(Debug, Clone, Default)]
pub struct SharedLocations {
    locations: Arc<RwLock<HashMap<String, Location>>>,
}

impl SharedLocations {
    pub fn new() -> SharedLocations {
        SharedLocations::default()
    }

    pub async fn add_location(&self, location: Location) {
        self.locations
            .write()
            .await
            .insert(location.id.clone(), location);
    }

    pub async fn has_location(&self, id: &str) -> bool {
        self.locations.read().await.contains_key(id)
    }

    pub async fn get_location(&self, id: &str) -> Option<Location> {
        self.locations.read().await.get(id).cloned()
    }

    pub async fn set_opening_hours(&self, id: &str, hours: OpeningHours) -> Option<Location> {
        let mut locations = self.locations.write().await;
        let location = locations.get_mut(id)?;
        location.opening_hours = hours;
        Some(location.clone())
    }

    pub async fn get_locations(&self) -> LocationVec {
        let locations = self.locations.read().await;
        let mut locations: Vec<Location> = locations.values().cloned().collect();
        locations.sort_by(|a, b| a.id.cmp(&b.id));
        LocationVec { locations }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_locations_keyed_by_slug() {
        let locations = SharedLocations::new();
        locations
            .add_location(Location::new("Main Depot", None))
            .await;

        assert!(locations.has_location("main-depot").await);
        assert!(!locations.has_location("elsewhere").await);
        assert_eq!(locations.get_locations().await.locations.len(), 1);
    }
}
