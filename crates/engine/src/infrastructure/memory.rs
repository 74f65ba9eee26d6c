//! In-memory storage and metadata for development and testing
//!
//! Nothing here persists across restarts. Uids are minted from process-local
//! counters starting at 1, so they never collide with `ItemUid::UNSAVED`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use fieldhost_domain::{
    CharacterId, DropBoxItem, InventoryTab, Item, ItemMetadata, ItemUid, MapEntityLayout, MapId,
    MapMetadata, NpcMetadata, Plot, PlotInfo, UgcCube,
};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{
    DropBoxPort, InventoryRepo, ItemMetadataPort, MapEntityPort, MapMetadataPort,
    NpcMetadataPort, RepoError, UgcRepo,
};

// =============================================================================
// Storage
// =============================================================================

/// In-memory item and UGC storage.
pub struct InMemoryStorage {
    items: RwLock<HashMap<ItemUid, (CharacterId, Item)>>,
    plots: RwLock<HashMap<(MapId, i32), Plot>>,
    next_item_uid: AtomicI64,
    next_cube_uid: AtomicI64,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            plots: RwLock::new(HashMap::new()),
            next_item_uid: AtomicI64::new(1),
            next_cube_uid: AtomicI64::new(1),
        }
    }

    fn mint_item_uid(&self) -> ItemUid {
        ItemUid::new(self.next_item_uid.fetch_add(1, Ordering::SeqCst))
    }

    /// Persist a new item for `owner`, assigning a uid.
    pub async fn create_item(&self, owner: CharacterId, mut item: Item) -> Item {
        item.uid = self.mint_item_uid();
        self.items
            .write()
            .await
            .insert(item.uid, (owner, item.clone()));
        item
    }

    /// Store a plot as-is, replacing any plot with the same map and number.
    pub async fn insert_plot(&self, plot: Plot) {
        let key = (plot.info.map_id, plot.info.number);
        self.plots.write().await.insert(key, plot);
    }

    pub async fn item_count(&self, owner: CharacterId) -> usize {
        self.items
            .read()
            .await
            .values()
            .filter(|(item_owner, _)| *item_owner == owner)
            .count()
    }

    pub async fn stored_item(&self, uid: ItemUid) -> Option<Item> {
        self.items.read().await.get(&uid).map(|(_, item)| item.clone())
    }
}

#[async_trait]
impl InventoryRepo for InMemoryStorage {
    async fn get_inventory(
        &self,
        owner: CharacterId,
    ) -> Result<HashMap<InventoryTab, Vec<Item>>, RepoError> {
        let items = self.items.read().await;
        let mut tabs: HashMap<InventoryTab, Vec<Item>> = HashMap::new();
        for (item_owner, item) in items.values() {
            if *item_owner == owner {
                tabs.entry(item.inventory).or_default().push(item.clone());
            }
        }
        for list in tabs.values_mut() {
            list.sort_by_key(|item| (item.slot, item.uid));
        }
        Ok(tabs)
    }

    async fn save_items(&self, owner: CharacterId, items: &[Item]) -> Result<(), RepoError> {
        let mut stored = self.items.write().await;
        if owner == CharacterId::NONE {
            for item in items {
                stored.remove(&item.uid);
            }
            return Ok(());
        }

        if let Some(unsaved) = items.iter().find(|item| !item.uid.is_saved()) {
            return Err(RepoError::constraint(format!(
                "Item {} has no uid and cannot be saved",
                unsaved.id
            )));
        }
        for item in items {
            stored.insert(item.uid, (owner, item.clone()));
        }
        Ok(())
    }

    async fn split_item(
        &self,
        owner: CharacterId,
        item: &Item,
        amount: i32,
    ) -> Result<Item, RepoError> {
        if amount <= 0 || amount >= item.amount {
            return Err(RepoError::constraint(format!(
                "Cannot split {} from a stack of {}",
                amount, item.amount
            )));
        }

        let mut split = item.clone();
        split.uid = self.mint_item_uid();
        split.amount = amount;
        split.slot = -1;
        if owner != CharacterId::NONE {
            self.items
                .write()
                .await
                .insert(split.uid, (owner, split.clone()));
        }
        Ok(split)
    }
}

#[async_trait]
impl UgcRepo for InMemoryStorage {
    async fn load_plots(&self, map_id: MapId) -> Result<Vec<Plot>, RepoError> {
        let plots = self.plots.read().await;
        let mut loaded: Vec<Plot> = plots
            .values()
            .filter(|plot| plot.info.map_id == map_id)
            .cloned()
            .collect();
        loaded.sort_by_key(Plot::number);
        Ok(loaded)
    }

    async fn save_cubes(
        &self,
        plot: &PlotInfo,
        cubes: &[UgcCube],
    ) -> Result<Vec<UgcCube>, RepoError> {
        let saved: Vec<UgcCube> = cubes
            .iter()
            .cloned()
            .map(|mut cube| {
                if cube.uid == 0 {
                    cube.uid = self.next_cube_uid.fetch_add(1, Ordering::SeqCst);
                }
                cube
            })
            .collect();

        let mut plots = self.plots.write().await;
        let stored = plots
            .entry((plot.map_id, plot.number))
            .or_insert_with(|| Plot::new(plot.clone()));
        stored.replace_cubes(saved.iter().cloned());
        Ok(saved)
    }
}

// =============================================================================
// Metadata
// =============================================================================

/// Static content tables assembled in code.
#[derive(Default)]
pub struct InMemoryMetadata {
    maps: HashMap<MapId, MapMetadata>,
    layouts: HashMap<String, MapEntityLayout>,
    npcs: HashMap<i32, NpcMetadata>,
    items: HashMap<i32, ItemMetadata>,
    drop_boxes: HashMap<i32, Vec<DropBoxItem>>,
}

impl InMemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a map and the layout of its content block.
    pub fn with_map(mut self, map: MapMetadata, layout: MapEntityLayout) -> Self {
        self.layouts.insert(map.x_block.clone(), layout);
        self.maps.insert(map.id, map);
        self
    }

    pub fn with_npc(mut self, npc: NpcMetadata) -> Self {
        self.npcs.insert(npc.id, npc);
        self
    }

    pub fn with_item(mut self, item: ItemMetadata) -> Self {
        self.items.insert(item.id, item);
        self
    }

    pub fn with_drop_box(mut self, box_id: i32, items: Vec<DropBoxItem>) -> Self {
        self.drop_boxes.insert(box_id, items);
        self
    }
}

impl MapMetadataPort for InMemoryMetadata {
    fn try_get(&self, map_id: MapId) -> Option<MapMetadata> {
        self.maps.get(&map_id).cloned()
    }
}

impl MapEntityPort for InMemoryMetadata {
    fn get(&self, x_block: &str) -> MapEntityLayout {
        self.layouts
            .get(x_block)
            .cloned()
            .unwrap_or_else(|| MapEntityLayout::empty(x_block))
    }
}

impl NpcMetadataPort for InMemoryMetadata {
    fn try_get(&self, npc_id: i32) -> Option<NpcMetadata> {
        self.npcs.get(&npc_id).cloned()
    }
}

impl ItemMetadataPort for InMemoryMetadata {
    fn try_get(&self, item_id: i32) -> Option<ItemMetadata> {
        self.items.get(&item_id).cloned()
    }
}

impl DropBoxPort for InMemoryMetadata {
    fn individual_drop_box(&self, box_id: i32) -> Vec<DropBoxItem> {
        self.drop_boxes.get(&box_id).cloned().unwrap_or_default()
    }
}
