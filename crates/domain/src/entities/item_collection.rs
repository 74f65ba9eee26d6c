//! Slot-indexed, bounded item container
//!
//! Invariants:
//! - slot indices are in `[0, size)`
//! - an item uid occupies at most one slot
//! - size only grows (see [`ItemCollection::expand`])

use std::collections::HashMap;

use crate::{DomainError, Item, ItemUid};

/// Hard ceiling for any single collection.
pub const MAX_COLLECTION_SIZE: i16 = 500;

/// One slot mutation produced by [`ItemCollection::add`].
#[derive(Debug, Clone, PartialEq)]
pub struct AddedItem {
    /// State of the slot after the mutation.
    pub item: Item,
    /// Amount that landed in this slot.
    pub added: i32,
}

#[derive(Debug, Clone, Default)]
pub struct ItemCollection {
    slots: Vec<Option<Item>>,
    index: HashMap<ItemUid, i16>,
}

impl ItemCollection {
    pub fn new(size: i16) -> Self {
        let size = size.clamp(0, MAX_COLLECTION_SIZE);
        Self {
            slots: vec![None; size as usize],
            index: HashMap::new(),
        }
    }

    pub fn size(&self) -> i16 {
        self.slots.len() as i16
    }

    pub fn count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn open_slots(&self) -> i16 {
        self.size() - self.count() as i16
    }

    pub fn contains(&self, uid: ItemUid) -> bool {
        self.index.contains_key(&uid)
    }

    pub fn get(&self, uid: ItemUid) -> Option<&Item> {
        let slot = *self.index.get(&uid)?;
        self.slot(slot)
    }

    pub fn get_mut(&mut self, uid: ItemUid) -> Option<&mut Item> {
        let slot = *self.index.get(&uid)?;
        self.slots.get_mut(slot as usize).and_then(Option::as_mut)
    }

    pub fn slot(&self, slot: i16) -> Option<&Item> {
        if slot < 0 {
            return None;
        }
        self.slots.get(slot as usize).and_then(Option::as_ref)
    }

    /// Items in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> + '_ {
        self.slots.iter().flatten()
    }

    /// Items in slot order, chunked for transfer.
    pub fn batch(&self, size: usize) -> Vec<Vec<Item>> {
        let items: Vec<Item> = self.iter().cloned().collect();
        items.chunks(size.max(1)).map(<[Item]>::to_vec).collect()
    }

    fn first_open_slot(&self) -> Option<i16> {
        self.slots
            .iter()
            .position(Option::is_none)
            .map(|slot| slot as i16)
    }

    fn stack_room_for(&self, item: &Item) -> i32 {
        self.iter()
            .filter(|existing| existing.can_stack_with(item))
            .map(Item::stack_room)
            .sum()
    }

    /// Whether [`ItemCollection::add`] with stacking would accept `item`.
    pub fn can_add(&self, item: &Item) -> bool {
        if item.amount <= 0 || self.contains(item.uid) {
            return false;
        }
        let room = if item.stack_limit > 1 {
            self.stack_room_for(item)
        } else {
            0
        };
        item.amount <= room || self.first_open_slot().is_some()
    }

    /// Insert `item`, optionally merging onto existing stacks first.
    ///
    /// The operation is all-or-nothing: when the remainder after merging has
    /// no open slot to go to, nothing is mutated. On success `item.amount`
    /// holds whatever was placed in a new slot (0 when fully merged).
    pub fn add(&mut self, item: &mut Item, stack: bool) -> Result<Vec<AddedItem>, DomainError> {
        if item.amount <= 0 {
            return Err(DomainError::validation("Item amount must be positive"));
        }
        if self.contains(item.uid) {
            return Err(DomainError::constraint(format!(
                "Item {} already in collection",
                item.uid
            )));
        }

        let room = if stack && item.stack_limit > 1 {
            self.stack_room_for(item)
        } else {
            0
        };
        let mut to_merge = room.min(item.amount);
        let remainder = item.amount - to_merge;
        let open_slot = if remainder > 0 {
            Some(self.first_open_slot().ok_or_else(|| {
                DomainError::container_full(self.count() as u32, self.size() as u32)
            })?)
        } else {
            None
        };

        let mut results = Vec::new();
        for existing in self.slots.iter_mut().flatten() {
            if to_merge == 0 {
                break;
            }
            if !existing.can_stack_with(item) {
                continue;
            }
            let take = existing.stack_room().min(to_merge);
            if take == 0 {
                continue;
            }
            existing.amount += take;
            to_merge -= take;
            results.push(AddedItem {
                item: existing.clone(),
                added: take,
            });
        }

        item.amount = remainder;
        if let Some(slot) = open_slot {
            item.slot = slot;
            self.slots[slot as usize] = Some(item.clone());
            self.index.insert(item.uid, slot);
            results.push(AddedItem {
                item: item.clone(),
                added: remainder,
            });
        }

        Ok(results)
    }

    /// Place `item` into an empty slot.
    pub fn insert_at(&mut self, slot: i16, mut item: Item) -> Result<(), DomainError> {
        if slot < 0 || slot >= self.size() {
            return Err(DomainError::invalid_slot(slot, self.size()));
        }
        if self.contains(item.uid) {
            return Err(DomainError::constraint(format!(
                "Item {} already in collection",
                item.uid
            )));
        }
        let entry = &mut self.slots[slot as usize];
        if entry.is_some() {
            return Err(DomainError::constraint(format!("Slot {} is occupied", slot)));
        }
        item.slot = slot;
        self.index.insert(item.uid, slot);
        *entry = Some(item);
        Ok(())
    }

    /// Remove by uid. The returned item keeps the slot it was taken from.
    pub fn remove(&mut self, uid: ItemUid) -> Option<Item> {
        let slot = self.index.remove(&uid)?;
        self.slots.get_mut(slot as usize).and_then(Option::take)
    }

    pub fn remove_slot(&mut self, slot: i16) -> Option<Item> {
        if slot < 0 {
            return None;
        }
        let item = self.slots.get_mut(slot as usize).and_then(Option::take)?;
        self.index.remove(&item.uid);
        Some(item)
    }

    /// Remove every item matching `predicate`, in slot order.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&Item) -> bool) -> Vec<Item> {
        let uids: Vec<ItemUid> = self
            .iter()
            .filter(|item| predicate(item))
            .map(|item| item.uid)
            .collect();
        uids.into_iter().filter_map(|uid| self.remove(uid)).collect()
    }

    /// Grow to `new_size`. Shrinking or exceeding the hard ceiling fails.
    pub fn expand(&mut self, new_size: i16) -> Result<(), DomainError> {
        if new_size <= self.size() {
            return Err(DomainError::constraint(format!(
                "Cannot shrink collection from {} to {}",
                self.size(),
                new_size
            )));
        }
        if new_size > MAX_COLLECTION_SIZE {
            return Err(DomainError::container_full(
                new_size as u32,
                MAX_COLLECTION_SIZE as u32,
            ));
        }
        self.slots.resize(new_size as usize, None);
        Ok(())
    }

    /// Compact to the front, ordered by content id, rarity and uid.
    pub fn sort(&mut self) {
        let mut items: Vec<Item> = self.slots.iter_mut().filter_map(Option::take).collect();
        items.sort_by_key(|item| (item.id, item.rarity, item.uid));

        self.index.clear();
        for (slot, mut item) in items.into_iter().enumerate() {
            item.slot = slot as i16;
            self.index.insert(item.uid, item.slot);
            self.slots[slot] = Some(item);
        }
    }
}
