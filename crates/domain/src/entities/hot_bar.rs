use serde::{Deserialize, Serialize};

use crate::ItemUid;

pub const HOT_BAR_SLOTS: usize = 25;
pub const ASSIGNABLE_SLOTS: usize = 22;

/// A skill or item binding on the hot bar. The default value is an empty slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickSlot {
    pub skill_id: i32,
    pub item_id: i32,
    pub item_uid: ItemUid,
}

impl QuickSlot {
    pub fn skill(skill_id: i32) -> Self {
        Self {
            skill_id,
            ..Self::default()
        }
    }

    pub fn item(item_id: i32, item_uid: ItemUid) -> Self {
        Self {
            skill_id: 0,
            item_id,
            item_uid,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotBar {
    slots: [QuickSlot; HOT_BAR_SLOTS],
}

impl Default for HotBar {
    fn default() -> Self {
        Self {
            slots: [QuickSlot::default(); HOT_BAR_SLOTS],
        }
    }
}

impl HotBar {
    /// Build from saved slots; extra entries are ignored.
    pub fn from_slots(saved: &[QuickSlot]) -> Self {
        let mut bar = Self::default();
        for (slot, quick_slot) in bar.slots.iter_mut().zip(saved) {
            *slot = *quick_slot;
        }
        bar
    }

    pub fn slots(&self) -> &[QuickSlot] {
        &self.slots
    }

    /// Bind `quick_slot` at `target`.
    ///
    /// An out-of-range target picks the first empty assignable slot, or slot 0
    /// when none is free. If the binding already sits elsewhere on the bar, the
    /// previous occupant of the target moves into its old position.
    pub fn move_quick_slot(&mut self, target: i32, quick_slot: QuickSlot) {
        let target = match usize::try_from(target) {
            Ok(index) if index < ASSIGNABLE_SLOTS => index,
            _ => self.slots[..ASSIGNABLE_SLOTS]
                .iter()
                .position(QuickSlot::is_empty)
                .unwrap_or(0),
        };

        if let Some(source) = self.find(quick_slot.skill_id, quick_slot.item_uid) {
            self.slots[source] = self.slots[target];
        }

        self.slots[target] = quick_slot;
    }

    pub fn remove_quick_slot(&mut self, skill_id: i32, item_uid: ItemUid) -> bool {
        match self.find(skill_id, item_uid) {
            Some(index) => {
                self.slots[index] = QuickSlot::default();
                true
            }
            None => false,
        }
    }

    fn find(&self, skill_id: i32, item_uid: ItemUid) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| !slot.is_empty() && slot.skill_id == skill_id && slot.item_uid == item_uid)
    }
}
