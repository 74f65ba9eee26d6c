//! Character-owned state the live engine reads and mutates

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{AccountId, CharacterId, Home, HotBar, InventoryTab};

/// Permanent unlocks purchased by the character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unlock {
    /// Extra slots bought per inventory tab.
    pub expand: HashMap<InventoryTab, i16>,
}

impl Unlock {
    pub fn expansion(&self, tab: InventoryTab) -> i16 {
        self.expand.get(&tab).copied().unwrap_or(0)
    }

    pub fn add_expansion(&mut self, tab: InventoryTab, slots: i16) {
        let expansion = self.expand.entry(tab).or_insert(0);
        *expansion = expansion.saturating_add(slots);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub meret: i64,
    pub meso: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub character_id: CharacterId,
    pub account_id: AccountId,
    pub name: String,
    pub home: Home,
    pub unlock: Unlock,
    pub currency: Currency,
    pub hot_bar: HotBar,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expansion_accumulates() {
        let mut unlock = Unlock::default();
        assert_eq!(unlock.expansion(InventoryTab::Gear), 0);
        unlock.add_expansion(InventoryTab::Gear, 6);
        unlock.add_expansion(InventoryTab::Gear, 6);
        assert_eq!(unlock.expansion(InventoryTab::Gear), 12);
        assert_eq!(unlock.expansion(InventoryTab::Misc), 0);
    }

    #[test]
    fn expansion_saturates_instead_of_overflowing() {
        let mut unlock = Unlock::default();
        unlock.expand.insert(InventoryTab::Gear, i16::MAX - 2);
        unlock.add_expansion(InventoryTab::Gear, 6);
        assert_eq!(unlock.expansion(InventoryTab::Gear), i16::MAX);
    }
}
