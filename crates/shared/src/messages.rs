//! Server notifications
//!
//! `ServerMessage` is what an outbound session channel or a field broadcast
//! carries. Each sub-enum groups the updates of one game system.

use fieldhost_domain::{
    Buff, FieldBreakable, FieldInteract, FieldItem, FieldPortal, FieldProperty, FieldPropertyKind,
    InventoryTab, Item, ItemUid, PlotInfo, TriggerObjectState,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Server Messages (Engine → Session)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    Inventory(ItemInventoryMessage),
    FieldProperty(FieldPropertyMessage),
    Camera(CameraMessage),
    Trigger(TriggerMessage),
    Breakable(BreakableMessage),
    Portal(PortalMessage),
    Interact(InteractMessage),
    Field(FieldMessage),
    Cube(CubeMessage),
    Buff(BuffMessage),
}

/// User-facing inventory failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemInventoryErrorCode {
    InvalidSlot,
    NotActiveTab,
    InventoryFull,
    CannotChargeMeret,
    ExpandMax,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "snake_case")]
pub enum ItemInventoryMessage {
    /// Clear the client's copy of a tab.
    Reset { tab: InventoryTab },
    /// Extra slots purchased for a tab.
    ExpandCount { tab: InventoryTab, count: i16 },
    Load { items: Vec<Item> },
    LoadTab { tab: InventoryTab, items: Vec<Item> },
    Add { item: Item },
    UpdateAmount { uid: ItemUid, amount: i32 },
    NotifyNew { uid: ItemUid, amount: i32 },
    Remove { uid: ItemUid },
    /// `dst_uid` is the item that was swapped out of `dst_slot`, if any.
    Move {
        dst_uid: Option<ItemUid>,
        src_slot: i16,
        uid: ItemUid,
        dst_slot: i16,
    },
    ExpandComplete,
    Error { code: ItemInventoryErrorCode },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "snake_case")]
pub enum FieldPropertyMessage {
    Add(FieldProperty),
    Remove(FieldPropertyKind),
    UserTagSymbol {
        symbol1: String,
        symbol2: String,
    },
    TimeScale {
        enabled: bool,
        start_scale: f32,
        end_scale: f32,
        duration: f32,
        interpolator: u8,
    },
    Background { dds: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "snake_case")]
pub enum CameraMessage {
    Local { camera_id: i32, enabled: bool },
    Interpolate { time: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "snake_case")]
pub enum TriggerMessage {
    Update(TriggerObjectState),
    CameraStart {
        path_ids: Vec<i32>,
        return_view: bool,
    },
    TimerDialog {
        timer_id: String,
        start_tick: i64,
        duration_ms: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "snake_case")]
pub enum BreakableMessage {
    Update(Vec<FieldBreakable>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "snake_case")]
pub enum PortalMessage {
    Update(FieldPortal),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "snake_case")]
pub enum InteractMessage {
    Update(FieldInteract),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "snake_case")]
pub enum FieldMessage {
    DropItem(FieldItem),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "snake_case")]
pub enum CubeMessage {
    UpdatePlot(PlotInfo),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "snake_case")]
pub enum BuffMessage {
    Add { object_id: i32, buff: Buff },
    Remove { object_id: i32, buff_id: i32 },
}

impl From<ItemInventoryMessage> for ServerMessage {
    fn from(message: ItemInventoryMessage) -> Self {
        ServerMessage::Inventory(message)
    }
}

impl From<FieldPropertyMessage> for ServerMessage {
    fn from(message: FieldPropertyMessage) -> Self {
        ServerMessage::FieldProperty(message)
    }
}

impl From<CameraMessage> for ServerMessage {
    fn from(message: CameraMessage) -> Self {
        ServerMessage::Camera(message)
    }
}

impl From<TriggerMessage> for ServerMessage {
    fn from(message: TriggerMessage) -> Self {
        ServerMessage::Trigger(message)
    }
}

impl From<BreakableMessage> for ServerMessage {
    fn from(message: BreakableMessage) -> Self {
        ServerMessage::Breakable(message)
    }
}

impl From<PortalMessage> for ServerMessage {
    fn from(message: PortalMessage) -> Self {
        ServerMessage::Portal(message)
    }
}

impl From<InteractMessage> for ServerMessage {
    fn from(message: InteractMessage) -> Self {
        ServerMessage::Interact(message)
    }
}

impl From<FieldMessage> for ServerMessage {
    fn from(message: FieldMessage) -> Self {
        ServerMessage::Field(message)
    }
}

impl From<CubeMessage> for ServerMessage {
    fn from(message: CubeMessage) -> Self {
        ServerMessage::Cube(message)
    }
}

impl From<BuffMessage> for ServerMessage {
    fn from(message: BuffMessage) -> Self {
        ServerMessage::Buff(message)
    }
}
