use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::bundle::Bundle;
use super::item::{Item, ItemStatus};

#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema, utoipa::ToResponse)]
pub struct ItemVec {
    pub items: Vec<Item>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema, utoipa::ToResponse)]
pub struct BundleVec {
    pub bundles: Vec<Bundle>,
}

/// Shared, concurrency-safe item registry
#[derive(Debug, Clone, Default)]
pub struct SharedInventory {
    items: Arc<RwLock<HashMap<Uuid, Item>>>,
}

impl SharedInventory {
    pub fn new() -> SharedInventory {
        SharedInventory::default()
    }

    pub async fn add_item(&self, item: Item) {
        self.items.write().await.insert(item.id, item);
    }

    pub async fn remove_item(&self, id: &Uuid) -> Option<Item> {
        self.items.write().await.remove(id)
    }

    pub async fn get_item(&self, id: &Uuid) -> Option<Item> {
        self.items.read().await.get(id).cloned()
    }

    /// Apply a mutation to one item; returns the updated item if it exists.
    pub async fn update_item<F>(&self, id: &Uuid, mutate: F) -> Option<Item>
    where
        F: FnOnce(&mut Item),
    {
        let mut items = self.items.write().await;
        let item = items.get_mut(id)?;
        mutate(item);
        Some(item.clone())
    }

    /// Flip a set of items to `OnLoan` under a single lock acquisition.
    ///
    /// Fails with the offending id when any item is missing or not
    /// `Available`; nothing is changed in that case. Two concurrent
    /// claims on the same item cannot both succeed.
    pub async fn try_mark_on_loan(&self, ids: &[Uuid]) -> Result<(), Uuid> {
        let mut items = self.items.write().await;
        for id in ids {
            match items.get(id) {
                Some(item) if item.is_available() => {}
                _ => return Err(*id),
            }
        }
        for id in ids {
            if let Some(item) = items.get_mut(id) {
                item.set_status(ItemStatus::OnLoan);
            }
        }
        Ok(())
    }

    pub async fn get_items(&self, location: Option<&str>) -> ItemVec {
        let items = self.items.read().await;
        let mut items: Vec<Item> = items
            .values()
            .filter(|item| location.is_none_or(|l| item.location_id == l))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.slug.cmp(&b.slug));
        ItemVec { items }
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

/// Shared, concurrency-safe bundle registry
#[derive(Debug, Clone, Default)]
pub struct SharedBundles {
    bundles: Arc<RwLock<HashMap<Uuid, Bundle>>>,
}

impl SharedBundles {
    pub fn new() -> SharedBundles {
        SharedBundles::default()
    }

    pub async fn add_bundle(&self, bundle: Bundle) {
        self.bundles.write().await.insert(bundle.id, bundle);
    }

    pub async fn remove_bundle(&self, id: &Uuid) -> Option<Bundle> {
        self.bundles.write().await.remove(id)
    }

    pub async fn get_bundle(&self, id: &Uuid) -> Option<Bundle> {
        self.bundles.read().await.get(id).cloned()
    }

    pub async fn get_bundles(&self, location: Option<&str>) -> BundleVec {
        let bundles = self.bundles.read().await;
        let mut bundles: Vec<Bundle> = bundles
            .values()
            .filter(|bundle| location.is_none_or(|l| bundle.location_id == l))
            .cloned()
            .collect();
        bundles.sort_by(|a, b| a.slug.cmp(&b.slug));
        BundleVec { bundles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inventory_add_get_remove() {
        let inventory = SharedInventory::new();
        let item = Item::new("Ladder", "loc-1", None);
        let id = item.id;

        inventory.add_item(item).await;
        assert_eq!(inventory.len().await, 1);
        assert!(inventory.get_item(&id).await.is_some());

        inventory.remove_item(&id).await;
        assert!(inventory.get_item(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_inventory_location_filter() {
        let inventory = SharedInventory::new();
        inventory.add_item(Item::new("Drill", "loc-1", None)).await;
        inventory.add_item(Item::new("Saw", "loc-2", None)).await;

        assert_eq!(inventory.get_items(Some("loc-1")).await.items.len(), 1);
        assert_eq!(inventory.get_items(None).await.items.len(), 2);
    }

    #[tokio::test]
    async fn test_try_mark_on_loan_claims_once() {
        let inventory = SharedInventory::new();
        let drill = Item::new("Drill", "loc-1", None);
        let id = drill.id;
        inventory.add_item(drill).await;

        assert!(inventory.try_mark_on_loan(&[id]).await.is_ok());
        assert_eq!(inventory.try_mark_on_loan(&[id]).await, Err(id));
    }

    #[tokio::test]
    async fn test_try_mark_on_loan_is_all_or_nothing() {
        let inventory = SharedInventory::new();
        let drill = Item::new("Drill", "loc-1", None);
        let saw = Item::new("Saw", "loc-1", None);
        let (drill_id, saw_id) = (drill.id, saw.id);
        inventory.add_item(drill).await;
        inventory.add_item(saw).await;

        inventory
            .update_item(&saw_id, |item| item.set_status(ItemStatus::Maintenance))
            .await;

        assert_eq!(
            inventory.try_mark_on_loan(&[drill_id, saw_id]).await,
            Err(saw_id)
        );
        let drill = inventory.get_item(&drill_id).await.unwrap();
        assert_eq!(drill.status, ItemStatus::Available);
    }

    #[tokio::test]
    async fn test_update_item() {
        let inventory = SharedInventory::new();
        let item = Item::new("Drill", "loc-1", None);
        let id = item.id;
        inventory.add_item(item).await;

        let updated = inventory
            .update_item(&id, |item| item.set_status(ItemStatus::OnLoan))
            .await
            .unwrap();
        assert_eq!(updated.status, ItemStatus::OnLoan);

        let missing = inventory
            .update_item(&Uuid::new_v4(), |item| item.set_status(ItemStatus::OnLoan))
            .await;
        assert!(missing.is_none());
    }
}
