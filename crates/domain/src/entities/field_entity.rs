//! Live entities placed in a field: actors, ground items and layout objects

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{CharacterId, Item, Vector3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakableState {
    Show,
    Break,
    Hide,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBreakable {
    pub trigger_id: i32,
    pub visible: bool,
    pub state: BreakableState,
}

impl FieldBreakable {
    pub fn new(trigger_id: i32) -> Self {
        Self {
            trigger_id,
            visible: true,
            state: BreakableState::Show,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPortal {
    pub id: i32,
    pub visible: bool,
    pub enabled: bool,
    pub minimap_visible: bool,
    pub target_map_id: i32,
    pub position: Vector3,
}

impl FieldPortal {
    pub fn new(id: i32, target_map_id: i32, position: Vector3) -> Self {
        Self {
            id,
            visible: true,
            enabled: true,
            minimap_visible: true,
            target_map_id,
            position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractState {
    Hidden,
    Reactable,
    Activated,
}

impl TryFrom<u8> for InteractState {
    type Error = crate::DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(InteractState::Hidden),
            1 => Ok(InteractState::Reactable),
            2 => Ok(InteractState::Activated),
            other => Err(crate::DomainError::parse(format!(
                "Unknown interact state: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInteract {
    pub id: i32,
    pub state: InteractState,
}

/// An item lying on the ground, waiting to be picked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldItem {
    pub object_id: i32,
    pub item: Item,
    pub position: Vector3,
    pub rotation: Vector3,
    /// Fixed items do not scatter when dropped.
    pub fixed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buff {
    pub id: i32,
    pub level: i16,
    pub caster_object_id: i32,
}

/// Active buffs on an actor, at most one per buff id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffSet {
    buffs: HashMap<i32, Buff>,
}

impl BuffSet {
    /// Apply a buff, refreshing the level if it is already active.
    pub fn add(&mut self, buff: Buff) {
        self.buffs.insert(buff.id, buff);
    }

    pub fn remove(&mut self, buff_id: i32) -> Option<Buff> {
        self.buffs.remove(&buff_id)
    }

    pub fn get(&self, buff_id: i32) -> Option<&Buff> {
        self.buffs.get(&buff_id)
    }

    pub fn contains(&self, buff_id: i32) -> bool {
        self.buffs.contains_key(&buff_id)
    }

    pub fn len(&self) -> usize {
        self.buffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPlayer {
    pub object_id: i32,
    pub character_id: CharacterId,
    pub name: String,
    pub position: Vector3,
    pub buffs: BuffSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpcKind {
    Friendly,
    Monster,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldNpc {
    pub object_id: i32,
    pub npc_id: i32,
    pub kind: NpcKind,
    pub position: Vector3,
    pub buffs: BuffSet,
}

/// Axis-aligned region used by scripts to select actors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerBox {
    pub id: i32,
    pub position: Vector3,
    pub dimensions: Vector3,
}

impl TriggerBox {
    pub fn new(id: i32, position: Vector3, dimensions: Vector3) -> Self {
        Self {
            id,
            position,
            dimensions,
        }
    }

    /// Whether `point` lies inside the box, edges included.
    pub fn contains(&self, point: Vector3) -> bool {
        let half_x = self.dimensions.x / 2.0;
        let half_y = self.dimensions.y / 2.0;
        let half_z = self.dimensions.z / 2.0;
        (point.x - self.position.x).abs() <= half_x
            && (point.y - self.position.y).abs() <= half_y
            && (point.z - self.position.z).abs() <= half_z
    }
}

/// Scripted item spawn point. `individual_drop_box_id` of 0 means no loot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSpawnPointItem {
    pub id: i32,
    pub position: Vector3,
    pub rotation: Vector3,
    pub individual_drop_box_id: i32,
}
