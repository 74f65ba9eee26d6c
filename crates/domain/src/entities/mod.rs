//! Domain entities - live game state objects with identity

mod character;
mod field_entity;
mod field_property;
mod hot_bar;
mod item;
mod item_collection;
mod plot;
mod tick_timer;
mod trigger_object;

pub use character::{Currency, Player, Unlock};
pub use field_entity::{
    BreakableState, Buff, BuffSet, EventSpawnPointItem, FieldBreakable, FieldInteract, FieldItem,
    FieldNpc, FieldPlayer, FieldPortal, InteractState, NpcKind, TriggerBox,
};
pub use field_property::{FieldProperty, FieldPropertyKind, WeatherType};
pub use hot_bar::{HotBar, QuickSlot, ASSIGNABLE_SLOTS, HOT_BAR_SLOTS};
pub use item::{InventoryTab, Item};
pub use item_collection::{AddedItem, ItemCollection, MAX_COLLECTION_SIZE};
pub use plot::{CubePosition, Home, HomePlot, Plot, PlotInfo, PlotUpdate, UgcCube};
pub use tick_timer::TickTimer;
pub use trigger_object::{
    TriggerActor, TriggerCamera, TriggerCube, TriggerEffect, TriggerLadder, TriggerMesh,
    TriggerObject, TriggerObjectState, TriggerRope, TriggerSound,
};
