//! Per-session item storage.
//!
//! One `InventoryManager` owns an `ItemCollection` per tab behind a single
//! async reader/writer lock. Public operations take the lock once and work on
//! the guarded `InventoryState` through unlocked helpers, so nothing ever
//! re-acquires a lock it already holds.
//!
//! Lock order: inventory state, then player.

mod error;

use std::collections::HashMap;
use std::sync::Arc;

use fieldhost_domain::{
    AddedItem, CharacterId, DomainError, InventoryTab, Item, ItemCollection, ItemUid, Player,
    MAX_COLLECTION_SIZE,
};
use fieldhost_shared::{ItemInventoryErrorCode, ItemInventoryMessage};
use tokio::sync::RwLock;

use crate::infrastructure::config::InventoryConfig;
use crate::infrastructure::ports::{
    ClockPort, InventoryRepo, ItemMetadataPort, RepoError, SessionOutbound,
};

pub use error::InventoryError;

struct InventoryState {
    tabs: HashMap<InventoryTab, ItemCollection>,
    /// Items leaving the character, deleted on the next save.
    delete: Vec<Item>,
}

impl InventoryState {
    fn tab_of(&self, uid: ItemUid) -> Option<InventoryTab> {
        self.tabs
            .iter()
            .find(|(_, items)| items.contains(uid))
            .map(|(tab, _)| *tab)
    }
}

pub struct InventoryManager {
    character_id: CharacterId,
    player: Arc<RwLock<Player>>,
    storage: Arc<dyn InventoryRepo>,
    item_metadata: Arc<dyn ItemMetadataPort>,
    outbound: Arc<dyn SessionOutbound>,
    clock: Arc<dyn ClockPort>,
    config: InventoryConfig,
    state: RwLock<InventoryState>,
}

impl InventoryManager {
    /// Build every tab from the player's unlocks and fill it from storage.
    ///
    /// Items that cannot be placed are logged and skipped so one bad record
    /// does not block the whole inventory.
    pub async fn new(
        player: Arc<RwLock<Player>>,
        storage: Arc<dyn InventoryRepo>,
        item_metadata: Arc<dyn ItemMetadataPort>,
        outbound: Arc<dyn SessionOutbound>,
        clock: Arc<dyn ClockPort>,
        config: InventoryConfig,
    ) -> Result<Self, RepoError> {
        let (character_id, unlock) = {
            let player = player.read().await;
            (player.character_id, player.unlock.clone())
        };

        let mut tabs: HashMap<InventoryTab, ItemCollection> = InventoryTab::ALL
            .into_iter()
            .map(|tab| {
                let size = config.base_capacity(tab).saturating_add(unlock.expansion(tab));
                if !(0..=MAX_COLLECTION_SIZE).contains(&size) {
                    tracing::warn!(
                        character_id = %character_id,
                        tab = %tab,
                        size,
                        "Tab size out of range, clamping"
                    );
                }
                (tab, ItemCollection::new(size))
            })
            .collect();

        for (tab, items) in storage.get_inventory(character_id).await? {
            let Some(collection) = tabs.get_mut(&tab) else {
                continue;
            };
            for mut item in items {
                let uid = item.uid;
                let slot_free = item.slot >= 0
                    && item.slot < collection.size()
                    && collection.slot(item.slot).is_none();
                let placed = if slot_free {
                    collection.insert_at(item.slot, item).is_ok()
                } else {
                    collection.add(&mut item, false).is_ok()
                };
                if !placed {
                    tracing::error!(
                        character_id = %character_id,
                        uid = %uid,
                        tab = %tab,
                        "Failed to add item"
                    );
                }
            }
        }

        Ok(Self {
            character_id,
            player,
            storage,
            item_metadata,
            outbound,
            clock,
            config,
            state: RwLock::new(InventoryState {
                tabs,
                delete: Vec::new(),
            }),
        })
    }

    fn send(&self, message: ItemInventoryMessage) {
        self.outbound.send(message.into());
    }

    /// Notify the session of a user-facing failure and hand the error back.
    fn reject(&self, code: ItemInventoryErrorCode, error: InventoryError) -> InventoryError {
        self.send(ItemInventoryMessage::Error { code });
        error
    }

    fn expansion_of(&self, tab: InventoryTab, items: &ItemCollection) -> i16 {
        items.size() - self.config.base_capacity(tab)
    }

    /// Send every tab to the session: reset, expansion count, then batches.
    pub async fn load(&self) {
        let state = self.state.read().await;
        for tab in InventoryTab::ALL {
            let Some(items) = state.tabs.get(&tab) else {
                continue;
            };
            self.send(ItemInventoryMessage::Reset { tab });
            self.send(ItemInventoryMessage::ExpandCount {
                tab,
                count: self.expansion_of(tab, items),
            });
            for batch in items.batch(self.config.batch_size) {
                self.send(ItemInventoryMessage::Load { items: batch });
            }
        }
    }

    /// Move an item within its tab, swapping with whatever occupies `dst_slot`.
    pub async fn move_item(&self, uid: ItemUid, dst_slot: i16) -> Result<(), InventoryError> {
        if dst_slot < 0 {
            return Err(self.reject(
                ItemInventoryErrorCode::InvalidSlot,
                InventoryError::InvalidSlot { slot: dst_slot },
            ));
        }

        let mut state = self.state.write().await;
        let tab = state.tab_of(uid).ok_or(InventoryError::ItemNotFound(uid))?;
        let items = state
            .tabs
            .get_mut(&tab)
            .ok_or(InventoryError::NotActiveTab(tab))?;
        if dst_slot >= items.size() {
            return Err(self.reject(
                ItemInventoryErrorCode::InvalidSlot,
                InventoryError::InvalidSlot { slot: dst_slot },
            ));
        }

        let source = items.remove(uid).ok_or(InventoryError::ItemNotFound(uid))?;
        let src_slot = source.slot;
        let displaced = items.remove_slot(dst_slot);
        let dst_uid = displaced.as_ref().map(|item| item.uid);
        if let Some(displaced) = displaced {
            items.insert_at(src_slot, displaced)?;
        }
        items.insert_at(dst_slot, source)?;

        self.send(ItemInventoryMessage::Move {
            dst_uid,
            src_slot,
            uid,
            dst_slot,
        });
        Ok(())
    }

    /// Add a persisted item to the tab of its category, stacking where possible.
    pub async fn add(&self, item: Item, notify_new: bool) -> Result<(), InventoryError> {
        if !item.uid.is_saved() {
            return Err(InventoryError::UnsavedItem(item.id));
        }

        let mut guard = self.state.write().await;
        let InventoryState { tabs, delete } = &mut *guard;
        let tab = item.inventory;
        let Some(items) = tabs.get_mut(&tab) else {
            return Err(self.reject(
                ItemInventoryErrorCode::NotActiveTab,
                InventoryError::NotActiveTab(tab),
            ));
        };

        let mut incoming = item;
        let placed = match items.add(&mut incoming, true) {
            Ok(placed) => placed,
            Err(DomainError::ContainerFull { .. }) => {
                return Err(self.reject(
                    ItemInventoryErrorCode::InventoryFull,
                    InventoryError::InventoryFull(tab),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        // Fully merged onto existing stacks.
        if incoming.amount == 0 {
            delete.push(incoming.clone());
        }

        for AddedItem { item, added } in placed {
            if item.uid == incoming.uid {
                self.send(ItemInventoryMessage::Add { item: item.clone() });
            } else {
                self.send(ItemInventoryMessage::UpdateAmount {
                    uid: item.uid,
                    amount: item.amount,
                });
            }
            if notify_new {
                self.send(ItemInventoryMessage::NotifyNew {
                    uid: item.uid,
                    amount: added,
                });
            }
        }
        Ok(())
    }

    pub async fn can_add(&self, item: &Item) -> bool {
        let state = self.state.read().await;
        state
            .tabs
            .get(&item.inventory)
            .is_some_and(|items| items.can_add(item))
    }

    /// Remove `amount` of an item, or the whole stack when `amount < 0`.
    ///
    /// A partial removal splits a new record off through storage; removing the
    /// exact stack size is a full removal.
    pub async fn remove(&self, uid: ItemUid, amount: i32) -> Result<Item, InventoryError> {
        let mut state = self.state.write().await;
        self.remove_locked(&mut state, uid, amount).await
    }

    async fn remove_locked(
        &self,
        state: &mut InventoryState,
        uid: ItemUid,
        amount: i32,
    ) -> Result<Item, InventoryError> {
        let tab = state.tab_of(uid).ok_or(InventoryError::ItemNotFound(uid))?;
        if amount == 0 {
            return Err(InventoryError::InvalidAmount { uid, amount });
        }
        let items = state
            .tabs
            .get_mut(&tab)
            .ok_or(InventoryError::NotActiveTab(tab))?;

        if amount > 0 {
            let current = items
                .get(uid)
                .cloned()
                .ok_or(InventoryError::ItemNotFound(uid))?;
            if current.amount < amount {
                return Err(InventoryError::InvalidAmount { uid, amount });
            }
            if current.amount > amount {
                let split = self
                    .storage
                    .split_item(CharacterId::NONE, &current, amount)
                    .await?;
                let remaining = match items.get_mut(uid) {
                    Some(source) => {
                        source.amount -= amount;
                        source.amount
                    }
                    None => return Err(InventoryError::ItemNotFound(uid)),
                };
                self.send(ItemInventoryMessage::UpdateAmount {
                    uid,
                    amount: remaining,
                });
                return Ok(split);
            }
        }

        let removed = items.remove(uid).ok_or(InventoryError::ItemNotFound(uid))?;
        self.send(ItemInventoryMessage::Remove { uid });
        Ok(removed)
    }

    /// Compact and order a tab, optionally discarding expired items first,
    /// then resend the tab.
    pub async fn sort(&self, tab: InventoryTab, remove_expired: bool) -> Result<(), InventoryError> {
        let mut guard = self.state.write().await;
        let InventoryState { tabs, delete } = &mut *guard;
        let Some(items) = tabs.get_mut(&tab) else {
            return Err(self.reject(
                ItemInventoryErrorCode::NotActiveTab,
                InventoryError::NotActiveTab(tab),
            ));
        };

        if remove_expired {
            let now = self.clock.now().timestamp();
            let expired = items.remove_where(|item| item.is_expired(now));
            if !expired.is_empty() {
                tracing::debug!(
                    character_id = %self.character_id,
                    tab = %tab,
                    count = expired.len(),
                    "Discarding expired items"
                );
            }
            delete.extend(expired);
        }
        items.sort();

        self.send(ItemInventoryMessage::Reset { tab });
        for batch in items.batch(self.config.batch_size) {
            self.send(ItemInventoryMessage::LoadTab { tab, items: batch });
        }
        Ok(())
    }

    /// Buy one more row of slots for a tab with meret.
    pub async fn expand(&self, tab: InventoryTab) -> Result<(), InventoryError> {
        let mut state = self.state.write().await;
        let Some(items) = state.tabs.get_mut(&tab) else {
            return Err(self.reject(
                ItemInventoryErrorCode::NotActiveTab,
                InventoryError::NotActiveTab(tab),
            ));
        };

        let mut player = self.player.write().await;
        let price = self.config.expand_price;
        if player.currency.meret < price {
            return Err(self.reject(
                ItemInventoryErrorCode::CannotChargeMeret,
                InventoryError::NotEnoughCurrency {
                    required: price,
                    available: player.currency.meret,
                },
            ));
        }

        let new_size = items.size().saturating_add(self.config.expand_slots);
        if items.expand(new_size).is_err() {
            return Err(self.reject(
                ItemInventoryErrorCode::ExpandMax,
                InventoryError::ExpandLimit(tab),
            ));
        }

        player.currency.meret -= price;
        player.unlock.add_expansion(tab, self.config.expand_slots);
        let count = self.expansion_of(tab, items);

        tracing::info!(
            character_id = %self.character_id,
            tab = %tab,
            size = items.size(),
            "Inventory expanded"
        );
        self.send(ItemInventoryMessage::ExpandCount { tab, count });
        self.send(ItemInventoryMessage::ExpandComplete);
        Ok(())
    }

    pub async fn free_slots(&self, tab: InventoryTab) -> i16 {
        let state = self.state.read().await;
        state.tabs.get(&tab).map_or(0, ItemCollection::open_slots)
    }

    pub async fn capacity(&self, tab: InventoryTab) -> Option<i16> {
        let state = self.state.read().await;
        state.tabs.get(&tab).map(ItemCollection::size)
    }

    pub async fn tab_of(&self, uid: ItemUid) -> Option<InventoryTab> {
        self.state.read().await.tab_of(uid)
    }

    pub async fn get(&self, uid: ItemUid) -> Option<Item> {
        let state = self.state.read().await;
        let tab = state.tab_of(uid)?;
        state.tabs.get(&tab)?.get(uid).cloned()
    }

    /// Item in a given slot of a tab.
    pub async fn slot(&self, tab: InventoryTab, slot: i16) -> Option<Item> {
        let state = self.state.read().await;
        state.tabs.get(&tab)?.slot(slot).cloned()
    }

    pub async fn item_count(&self) -> usize {
        let state = self.state.read().await;
        state.tabs.values().map(ItemCollection::count).sum()
    }

    /// Items of content `id` (and `rarity`, when given) in the tab its
    /// metadata assigns, copied out so no lock outlives the call.
    pub async fn find_by_content_id(&self, id: i32, rarity: Option<i16>) -> FoundItems {
        let Some(metadata) = self.item_metadata.try_get(id) else {
            return FoundItems::default();
        };
        let tab = metadata.inventory;

        let state = self.state.read().await;
        let Some(items) = state.tabs.get(&tab) else {
            self.send(ItemInventoryMessage::Error {
                code: ItemInventoryErrorCode::NotActiveTab,
            });
            return FoundItems::default();
        };

        FoundItems {
            items: items
                .iter()
                .filter(|item| item.id == id && rarity.map_or(true, |r| item.rarity == r))
                .cloned()
                .collect(),
        }
    }

    /// Queue an item that already left its tab for deletion on the next save.
    pub async fn discard(&self, item: Item) {
        self.state.write().await.delete.push(item);
    }

    pub async fn pending_deletes(&self) -> usize {
        self.state.read().await.delete.len()
    }

    /// Persist the deletion queue, then every tab.
    pub async fn save(&self, repo: &dyn InventoryRepo) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        repo.save_items(CharacterId::NONE, &state.delete).await?;
        state.delete.clear();

        for tab in InventoryTab::ALL {
            let Some(items) = state.tabs.get(&tab) else {
                continue;
            };
            let items: Vec<Item> = items.iter().cloned().collect();
            repo.save_items(self.character_id, &items).await?;
        }

        tracing::debug!(character_id = %self.character_id, "Inventory saved");
        Ok(())
    }
}

/// Snapshot of the items matched by [`InventoryManager::find_by_content_id`].
#[derive(Debug, Clone, Default)]
pub struct FoundItems {
    items: Vec<Item>,
}

impl FoundItems {
    /// Iterate from the start; may be called any number of times.
    pub fn iter(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_amount(&self) -> i32 {
        self.items.iter().map(|item| item.amount).sum()
    }
}

#[cfg(test)]
mod tests;
