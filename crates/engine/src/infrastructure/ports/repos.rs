//! Persistence ports for character items and UGC plots.

use std::collections::HashMap;

use async_trait::async_trait;
use fieldhost_domain::{CharacterId, InventoryTab, Item, MapId, Plot, PlotInfo, UgcCube};

use super::error::RepoError;

// =============================================================================
// Item Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepo: Send + Sync {
    /// Every item owned by the character, grouped by tab.
    async fn get_inventory(
        &self,
        owner: CharacterId,
    ) -> Result<HashMap<InventoryTab, Vec<Item>>, RepoError>;

    /// Upsert `items` under `owner`. Saving under [`CharacterId::NONE`] deletes them.
    async fn save_items(&self, owner: CharacterId, items: &[Item]) -> Result<(), RepoError>;

    /// Persist `amount` split off `item` as a new record with a fresh uid.
    async fn split_item(
        &self,
        owner: CharacterId,
        item: &Item,
        amount: i32,
    ) -> Result<Item, RepoError>;
}

// =============================================================================
// UGC Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UgcRepo: Send + Sync {
    async fn load_plots(&self, map_id: MapId) -> Result<Vec<Plot>, RepoError>;

    /// Replace the stored cubes of a plot and return the canonical records,
    /// with persistence-assigned uids.
    async fn save_cubes(
        &self,
        plot: &PlotInfo,
        cubes: &[UgcCube],
    ) -> Result<Vec<UgcCube>, RepoError>;
}
