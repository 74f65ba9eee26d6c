//! Item entity - a stack of one content type owned by an inventory tab
//!
//! Items are minted by the persistence layer (which assigns the uid) or
//! created unsaved from item metadata when spawned into a field. While an
//! item is active it lives in exactly one `ItemCollection`.

use serde::{Deserialize, Serialize};

use crate::{DomainError, ItemMetadata, ItemUid};

/// Inventory categories, each with its own slot space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryTab {
    Gear,
    Outfit,
    Mount,
    Catalyst,
    FishingMusic,
    Quest,
    Gemstone,
    Misc,
    LifeSkill,
    Pets,
    Consumable,
    Currency,
    Badge,
    Lapenshard,
    Fragment,
}

impl InventoryTab {
    pub const ALL: [InventoryTab; 15] = [
        InventoryTab::Gear,
        InventoryTab::Outfit,
        InventoryTab::Mount,
        InventoryTab::Catalyst,
        InventoryTab::FishingMusic,
        InventoryTab::Quest,
        InventoryTab::Gemstone,
        InventoryTab::Misc,
        InventoryTab::LifeSkill,
        InventoryTab::Pets,
        InventoryTab::Consumable,
        InventoryTab::Currency,
        InventoryTab::Badge,
        InventoryTab::Lapenshard,
        InventoryTab::Fragment,
    ];

    /// Slots every character has in this tab before any expansion.
    pub const fn base_capacity(self) -> i16 {
        match self {
            InventoryTab::Gear => 48,
            InventoryTab::Outfit => 150,
            InventoryTab::Mount => 48,
            InventoryTab::Catalyst => 48,
            InventoryTab::FishingMusic => 48,
            InventoryTab::Quest => 48,
            InventoryTab::Gemstone => 48,
            InventoryTab::Misc => 84,
            InventoryTab::LifeSkill => 126,
            InventoryTab::Pets => 60,
            InventoryTab::Consumable => 84,
            InventoryTab::Currency => 48,
            InventoryTab::Badge => 60,
            InventoryTab::Lapenshard => 48,
            InventoryTab::Fragment => 48,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            InventoryTab::Gear => "gear",
            InventoryTab::Outfit => "outfit",
            InventoryTab::Mount => "mount",
            InventoryTab::Catalyst => "catalyst",
            InventoryTab::FishingMusic => "fishing_music",
            InventoryTab::Quest => "quest",
            InventoryTab::Gemstone => "gemstone",
            InventoryTab::Misc => "misc",
            InventoryTab::LifeSkill => "life_skill",
            InventoryTab::Pets => "pets",
            InventoryTab::Consumable => "consumable",
            InventoryTab::Currency => "currency",
            InventoryTab::Badge => "badge",
            InventoryTab::Lapenshard => "lapenshard",
            InventoryTab::Fragment => "fragment",
        }
    }
}

impl std::fmt::Display for InventoryTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InventoryTab {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InventoryTab::ALL
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::parse(format!("Unknown inventory tab: {}", s)))
    }
}

/// A stack of one content type.
///
/// `slot` is -1 while the item is not placed in a collection.
/// `expiry_time` is a unix timestamp in seconds; `None` never expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub uid: ItemUid,
    pub id: i32,
    pub amount: i32,
    pub stack_limit: i32,
    pub rarity: i16,
    pub slot: i16,
    pub inventory: InventoryTab,
    pub expiry_time: Option<i64>,
}

impl Item {
    pub fn new(uid: ItemUid, id: i32, inventory: InventoryTab) -> Self {
        Self {
            uid,
            id,
            amount: 1,
            stack_limit: 1,
            rarity: 1,
            slot: -1,
            inventory,
            expiry_time: None,
        }
    }

    /// Create an unsaved item from content metadata.
    pub fn from_metadata(metadata: &ItemMetadata, amount: i32, rarity: i16) -> Self {
        Self {
            uid: ItemUid::UNSAVED,
            id: metadata.id,
            amount,
            stack_limit: metadata.stack_limit,
            rarity,
            slot: -1,
            inventory: metadata.inventory,
            expiry_time: None,
        }
    }

    pub fn with_amount(mut self, amount: i32) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_stack_limit(mut self, stack_limit: i32) -> Self {
        self.stack_limit = stack_limit;
        self
    }

    pub fn with_rarity(mut self, rarity: i16) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_expiry(mut self, expiry_time: i64) -> Self {
        self.expiry_time = Some(expiry_time);
        self
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expiry_time.is_some_and(|expiry| expiry <= now)
    }

    /// Whether `other` may be merged onto this stack.
    pub fn can_stack_with(&self, other: &Item) -> bool {
        self.uid != other.uid
            && self.id == other.id
            && self.rarity == other.rarity
            && self.stack_limit > 1
            && self.expiry_time == other.expiry_time
    }

    /// Amount this stack can still absorb.
    pub fn stack_room(&self) -> i32 {
        (self.stack_limit - self.amount).max(0)
    }
}
