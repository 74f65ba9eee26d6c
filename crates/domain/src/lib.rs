//! fieldhost domain - live game state types and their invariants
//!
//! Everything here is synchronous and free of I/O. Locking, persistence and
//! notification delivery belong to `fieldhost-engine`.

extern crate self as fieldhost_domain;

pub mod entities;
pub mod error;
pub mod ids;
pub mod metadata;
pub mod value_objects;

pub use entities::{
    AddedItem, BreakableState, Buff, BuffSet, CubePosition, Currency, EventSpawnPointItem,
    FieldBreakable, FieldInteract, FieldItem, FieldNpc, FieldPlayer, FieldPortal, FieldProperty,
    FieldPropertyKind, Home, HomePlot, HotBar, InteractState, InventoryTab, Item, ItemCollection,
    NpcKind, Player, Plot, PlotInfo, PlotUpdate, QuickSlot, TickTimer, TriggerActor, TriggerBox,
    TriggerCamera, TriggerCube, TriggerEffect, TriggerLadder, TriggerMesh, TriggerObject,
    TriggerObjectState, TriggerRope, TriggerSound, UgcCube, Unlock, WeatherType,
    ASSIGNABLE_SLOTS, HOT_BAR_SLOTS, MAX_COLLECTION_SIZE,
};
pub use error::DomainError;
pub use ids::{AccountId, CharacterId, InstanceId, ItemUid, MapId, PlotId};
pub use metadata::{
    DropBoxItem, ItemMetadata, MapEntityLayout, MapMetadata, NpcMetadata, NpcSpawn,
};
pub use value_objects::Vector3;
