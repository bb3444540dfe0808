pub mod bundle;
pub mod item;
pub mod shared_inventory;

pub use bundle::Bundle;
pub use item::{Item, ItemStatus};
pub use shared_inventory::{BundleVec, ItemVec, SharedBundles, SharedInventory};
