//! Read-only game content records
//!
//! These are loaded by an external metadata provider and never mutated by the
//! engine. A field materializes its static objects from a [`MapEntityLayout`].

use serde::{Deserialize, Serialize};

use crate::{
    EventSpawnPointItem, FieldBreakable, FieldInteract, FieldPortal, InventoryTab, MapId, NpcKind,
    TriggerBox, TriggerObjectState, Vector3,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapMetadata {
    pub id: MapId,
    pub name: String,
    /// Content block holding this map's entity layout.
    pub x_block: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcSpawn {
    pub npc_id: i32,
    pub position: Vector3,
}

/// Static objects of one map content block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapEntityLayout {
    pub x_block: String,
    pub trigger_objects: Vec<TriggerObjectState>,
    pub portals: Vec<FieldPortal>,
    pub breakables: Vec<FieldBreakable>,
    pub interacts: Vec<FieldInteract>,
    pub boxes: Vec<TriggerBox>,
    pub item_spawns: Vec<EventSpawnPointItem>,
    pub npc_spawns: Vec<NpcSpawn>,
    /// Plot numbers laid out in this block.
    pub plots: Vec<i32>,
}

impl MapEntityLayout {
    pub fn empty(x_block: impl Into<String>) -> Self {
        Self {
            x_block: x_block.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcMetadata {
    pub id: i32,
    pub name: String,
    pub kind: NpcKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMetadata {
    pub id: i32,
    pub name: String,
    pub inventory: InventoryTab,
    pub stack_limit: i32,
    pub rarity: i16,
}

/// One entry of an individual drop box (loot table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropBoxItem {
    pub item_id: i32,
    pub amount: i32,
    pub rarity: i16,
}
