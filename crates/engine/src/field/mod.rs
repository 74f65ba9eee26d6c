//! Live map instances.
//!
//! A `FieldManager` owns every piece of mutable state of one (map, instance)
//! pair. Entity registries are concurrent maps so session handlers and the
//! trigger script of the field can touch them without a field-wide lock.
//! Plots carry their own async mutex (see `ugc`).

mod error;
mod events;
mod objects;
mod ugc;

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use fieldhost_domain::{
    Buff, CharacterId, EventSpawnPointItem, FieldBreakable, FieldInteract, FieldItem, FieldNpc,
    FieldPlayer, FieldPortal, FieldProperty, FieldPropertyKind, InstanceId, InteractState, Item,
    MapEntityLayout, MapId, MapMetadata, NpcKind, Plot, PlotInfo, TickTimer, TriggerBox,
    TriggerObject, Vector3,
};
use fieldhost_shared::{
    BuffMessage, FieldPropertyMessage, InteractMessage, ServerMessage, TriggerMessage,
};
use tokio::sync::{broadcast, OnceCell};

use crate::infrastructure::config::FieldConfig;
use crate::infrastructure::ports::{ClockPort, NpcMetadataPort};

pub use error::FieldError;
pub use events::{EventQueue, FieldEvent};
pub use objects::TriggerObjects;

pub struct FieldManager {
    metadata: MapMetadata,
    instance_id: InstanceId,

    players: DashMap<i32, FieldPlayer>,
    npcs: DashMap<i32, FieldNpc>,
    items: DashMap<i32, FieldItem>,
    breakables: DashMap<i32, FieldBreakable>,
    portals: DashMap<i32, FieldPortal>,
    interacts: DashMap<i32, FieldInteract>,
    properties: DashMap<FieldPropertyKind, FieldProperty>,
    timers: DashMap<String, TickTimer>,
    objects: TriggerObjects,

    // Static layout, never mutated after construction
    boxes: HashMap<i32, TriggerBox>,
    item_spawns: HashMap<i32, EventSpawnPointItem>,

    background: Mutex<Option<String>>,
    events: EventQueue,
    plots: DashMap<i32, Arc<tokio::sync::Mutex<Plot>>>,

    broadcaster: broadcast::Sender<ServerMessage>,
    next_object_id: AtomicI32,
    plots_loaded: OnceCell<bool>,
    disposed: AtomicBool,
    clock: Arc<dyn ClockPort>,
}

impl fmt::Debug for FieldManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldManager")
            .field("map_id", &self.map_id())
            .field("instance_id", &self.instance_id)
            .field("players", &self.players.len())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

impl FieldManager {
    /// Materialize a field from its map metadata and entity layout.
    pub fn new(
        metadata: MapMetadata,
        instance_id: InstanceId,
        layout: MapEntityLayout,
        npc_metadata: &dyn NpcMetadataPort,
        clock: Arc<dyn ClockPort>,
        config: &FieldConfig,
    ) -> Self {
        let (broadcaster, _) = broadcast::channel(config.event_channel_capacity.max(1));
        let map_id = metadata.id;

        let field = Self {
            instance_id,
            players: DashMap::new(),
            npcs: DashMap::new(),
            items: DashMap::new(),
            breakables: layout
                .breakables
                .into_iter()
                .map(|breakable| (breakable.trigger_id, breakable))
                .collect(),
            portals: layout
                .portals
                .into_iter()
                .map(|portal| (portal.id, portal))
                .collect(),
            interacts: layout
                .interacts
                .into_iter()
                .map(|interact| (interact.id, interact))
                .collect(),
            properties: DashMap::new(),
            timers: DashMap::new(),
            objects: TriggerObjects::from_states(layout.trigger_objects),
            boxes: layout
                .boxes
                .into_iter()
                .map(|region| (region.id, region))
                .collect(),
            item_spawns: layout
                .item_spawns
                .into_iter()
                .map(|spawn| (spawn.id, spawn))
                .collect(),
            background: Mutex::new(None),
            events: EventQueue::new(),
            plots: layout
                .plots
                .into_iter()
                .map(|number| {
                    let plot = Plot::new(PlotInfo::unowned(map_id, number));
                    (number, Arc::new(tokio::sync::Mutex::new(plot)))
                })
                .collect(),
            broadcaster,
            next_object_id: AtomicI32::new(1),
            plots_loaded: OnceCell::new(),
            disposed: AtomicBool::new(false),
            clock,
            metadata,
        };

        for spawn in layout.npc_spawns {
            let Some(npc) = npc_metadata.try_get(spawn.npc_id) else {
                tracing::warn!(map_id = %map_id, npc_id = spawn.npc_id, "Unknown npc in layout");
                continue;
            };
            let object_id = field.next_object_id();
            field.npcs.insert(
                object_id,
                FieldNpc {
                    object_id,
                    npc_id: npc.id,
                    kind: npc.kind,
                    position: spawn.position,
                    buffs: Default::default(),
                },
            );
        }

        tracing::debug!(
            map_id = %map_id,
            instance_id = %instance_id,
            npcs = field.npcs.len(),
            trigger_objects = field.objects.len(),
            plots = field.plots.len(),
            "Field created"
        );
        field
    }

    pub fn map_id(&self) -> MapId {
        self.metadata.id
    }

    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Current field tick in milliseconds.
    pub fn tick(&self) -> i64 {
        self.clock.now().timestamp_millis()
    }

    pub fn next_object_id(&self) -> i32 {
        self.next_object_id.fetch_add(1, Ordering::Relaxed)
    }

    // =========================================================================
    // Observers
    // =========================================================================

    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.broadcaster.subscribe()
    }

    /// Deliver to every observer. Having no observers is not an error.
    pub fn broadcast(&self, message: impl Into<ServerMessage>) {
        if self.broadcaster.send(message.into()).is_err() {
            tracing::trace!(map_id = %self.map_id(), "Broadcast with no observers");
        }
    }

    // =========================================================================
    // Actors
    // =========================================================================

    pub fn add_player(&self, character_id: CharacterId, name: &str, position: Vector3) -> i32 {
        let object_id = self.next_object_id();
        self.players.insert(
            object_id,
            FieldPlayer {
                object_id,
                character_id,
                name: name.to_string(),
                position,
                buffs: Default::default(),
            },
        );
        tracing::info!(
            map_id = %self.map_id(),
            character_id = %character_id,
            object_id,
            "Player entered field"
        );
        object_id
    }

    pub fn remove_player(&self, object_id: i32) -> Option<FieldPlayer> {
        self.players.remove(&object_id).map(|(_, player)| player)
    }

    pub fn move_player(&self, object_id: i32, position: Vector3) -> bool {
        match self.players.get_mut(&object_id) {
            Some(mut player) => {
                player.position = position;
                true
            }
            None => false,
        }
    }

    pub fn player(&self, object_id: i32) -> Option<FieldPlayer> {
        self.players.get(&object_id).map(|p| p.clone())
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn npc(&self, object_id: i32) -> Option<FieldNpc> {
        self.npcs.get(&object_id).map(|n| n.clone())
    }

    pub fn npc_count(&self) -> usize {
        self.npcs.len()
    }

    fn boxes_for<'a>(&'a self, box_ids: &'a [i32]) -> impl Iterator<Item = &'a TriggerBox> + 'a {
        box_ids.iter().filter_map(move |id| {
            let region = self.boxes.get(id);
            if region.is_none() {
                tracing::warn!(map_id = %self.map_id(), box_id = id, "Invalid box");
            }
            region
        })
    }

    /// Object ids of players inside any of the boxes, ascending.
    pub fn players_in_boxes(&self, box_ids: &[i32]) -> Vec<i32> {
        let regions: Vec<&TriggerBox> = self.boxes_for(box_ids).collect();
        let mut ids: Vec<i32> = self
            .players
            .iter()
            .filter(|player| regions.iter().any(|region| region.contains(player.position)))
            .map(|player| player.object_id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Object ids of monsters inside any of the boxes, ascending.
    pub fn monsters_in_boxes(&self, box_ids: &[i32]) -> Vec<i32> {
        let regions: Vec<&TriggerBox> = self.boxes_for(box_ids).collect();
        let mut ids: Vec<i32> = self
            .npcs
            .iter()
            .filter(|npc| npc.kind == NpcKind::Monster)
            .filter(|npc| regions.iter().any(|region| region.contains(npc.position)))
            .map(|npc| npc.object_id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Apply a buff to a player or npc. Returns false for unknown actors.
    pub fn add_buff(&self, object_id: i32, buff: Buff) -> bool {
        let applied = if let Some(mut player) = self.players.get_mut(&object_id) {
            player.buffs.add(buff.clone());
            true
        } else if let Some(mut npc) = self.npcs.get_mut(&object_id) {
            npc.buffs.add(buff.clone());
            true
        } else {
            false
        };

        if applied {
            self.broadcast(BuffMessage::Add { object_id, buff });
        }
        applied
    }

    pub fn remove_buff(&self, object_id: i32, buff_id: i32) -> bool {
        let removed = if let Some(mut player) = self.players.get_mut(&object_id) {
            player.buffs.remove(buff_id).is_some()
        } else if let Some(mut npc) = self.npcs.get_mut(&object_id) {
            npc.buffs.remove(buff_id).is_some()
        } else {
            false
        };

        if removed {
            self.broadcast(BuffMessage::Remove { object_id, buff_id });
        }
        removed
    }

    // =========================================================================
    // Ground items
    // =========================================================================

    pub fn item_spawn(&self, spawn_id: i32) -> Option<&EventSpawnPointItem> {
        self.item_spawns.get(&spawn_id)
    }

    /// Drop an item on the ground. The caller is responsible for broadcasting.
    pub fn spawn_item(&self, position: Vector3, rotation: Vector3, item: Item, fixed: bool) -> FieldItem {
        let field_item = FieldItem {
            object_id: self.next_object_id(),
            item,
            position,
            rotation,
            fixed,
        };
        self.items.insert(field_item.object_id, field_item.clone());
        field_item
    }

    pub fn take_item(&self, object_id: i32) -> Option<FieldItem> {
        self.items.remove(&object_id).map(|(_, item)| item)
    }

    pub fn ground_items(&self) -> Vec<FieldItem> {
        let mut items: Vec<FieldItem> = self.items.iter().map(|item| item.clone()).collect();
        items.sort_by_key(|item| item.object_id);
        items
    }

    // =========================================================================
    // Layout objects
    // =========================================================================

    pub fn objects(&self) -> &TriggerObjects {
        &self.objects
    }

    pub fn breakable(&self, trigger_id: i32) -> Option<FieldBreakable> {
        self.breakables.get(&trigger_id).map(|b| b.clone())
    }

    /// Mutate every known breakable among `trigger_ids` and return their new
    /// states, in request order. Unknown ids are skipped.
    pub fn update_breakables(
        &self,
        trigger_ids: &[i32],
        mut update: impl FnMut(&mut FieldBreakable),
    ) -> Vec<FieldBreakable> {
        let mut updated = Vec::with_capacity(trigger_ids.len());
        for trigger_id in trigger_ids {
            match self.breakables.get_mut(trigger_id) {
                Some(mut breakable) => {
                    update(breakable.value_mut());
                    updated.push(breakable.clone());
                }
                None => {
                    tracing::debug!(map_id = %self.map_id(), trigger_id, "Invalid breakable");
                }
            }
        }
        updated
    }

    pub fn portal(&self, portal_id: i32) -> Option<FieldPortal> {
        self.portals.get(&portal_id).map(|p| p.clone())
    }

    pub fn update_portal(
        &self,
        portal_id: i32,
        update: impl FnOnce(&mut FieldPortal),
    ) -> Option<FieldPortal> {
        let mut portal = self.portals.get_mut(&portal_id)?;
        update(portal.value_mut());
        Some(portal.clone())
    }

    pub fn interact(&self, interact_id: i32) -> Option<FieldInteract> {
        self.interacts.get(&interact_id).map(|i| i.clone())
    }

    /// Set the state of every listed interactable and broadcast each change.
    pub fn set_interact_state(&self, interact_ids: &[i32], state: InteractState) -> usize {
        let mut changed = 0;
        for interact_id in interact_ids {
            let updated = match self.interacts.get_mut(interact_id) {
                Some(mut interact) => {
                    interact.state = state;
                    interact.clone()
                }
                None => continue,
            };
            changed += 1;
            self.broadcast(InteractMessage::Update(updated));
        }
        changed
    }

    /// Whether every listed interactable present in the field is in `state`.
    pub fn interacts_match(&self, interact_ids: &[i32], state: InteractState) -> bool {
        interact_ids.iter().all(|id| {
            self.interacts
                .get(id)
                .map_or(true, |interact| interact.state == state)
        })
    }

    /// Apply a mesh change and broadcast it. Shared by immediate and scheduled
    /// updates. A `scale` of 0 keeps the current scale; fade is left as set.
    pub fn apply_mesh_update(&self, trigger_id: i32, visible: bool, fade: i32, scale: f32) -> bool {
        let state = match self.objects.meshes.get_mut(&trigger_id) {
            Some(mut mesh) => {
                mesh.visible = visible;
                mesh.fade = fade;
                if scale != 0.0 {
                    mesh.scale = scale;
                }
                mesh.to_state()
            }
            None => return false,
        };
        self.broadcast(TriggerMessage::Update(state));
        true
    }

    // =========================================================================
    // Field properties
    // =========================================================================

    pub fn background(&self) -> Option<String> {
        self.background
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_background(&self, dds: &str) {
        *self.background.lock().unwrap_or_else(PoisonError::into_inner) = Some(dds.to_string());
        self.broadcast(FieldPropertyMessage::Background {
            dds: dds.to_string(),
        });
    }

    /// Add or replace the property of the same kind.
    pub fn add_property(&self, property: FieldProperty) {
        self.properties.insert(property.kind(), property.clone());
        self.broadcast(FieldPropertyMessage::Add(property));
    }

    pub fn remove_property(&self, kind: FieldPropertyKind) -> bool {
        if self.properties.remove(&kind).is_none() {
            return false;
        }
        self.broadcast(FieldPropertyMessage::Remove(kind));
        true
    }

    pub fn property(&self, kind: FieldPropertyKind) -> Option<FieldProperty> {
        self.properties.get(&kind).map(|p| p.clone())
    }

    // =========================================================================
    // Timers and events
    // =========================================================================

    /// Start (or restart) a timer from the current tick.
    pub fn set_timer(&self, timer_id: &str, duration_ms: i64) -> TickTimer {
        let timer = TickTimer::new(duration_ms, self.tick());
        self.timers.insert(timer_id.to_string(), timer);
        timer
    }

    pub fn reset_timer(&self, timer_id: &str) -> Option<TickTimer> {
        let now = self.tick();
        let mut timer = self.timers.get_mut(timer_id)?;
        timer.reset(now);
        Some(*timer)
    }

    pub fn timer(&self, timer_id: &str) -> Option<TickTimer> {
        self.timers.get(timer_id).map(|t| *t)
    }

    /// `None` when no such timer exists.
    pub fn timer_expired(&self, timer_id: &str) -> Option<bool> {
        let now = self.tick();
        self.timer(timer_id).map(|timer| timer.expired(now))
    }

    pub fn schedule(&self, delay_ms: i64, event: FieldEvent) {
        self.events.schedule(self.tick() + delay_ms.max(0), event);
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Run every scheduled event that is due. Returns how many ran.
    pub fn process_events(&self) -> usize {
        if self.is_disposed() {
            return 0;
        }
        let due = self.events.drain_due(self.tick());
        let count = due.len();
        for event in due {
            match event {
                FieldEvent::UpdateMesh {
                    trigger_id,
                    visible,
                    fade,
                    scale,
                } => {
                    if !self.apply_mesh_update(trigger_id, visible, fade, scale) {
                        tracing::warn!(map_id = %self.map_id(), trigger_id, "Scheduled update for missing mesh");
                    }
                }
            }
        }
        count
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Release every live entity and cancel timers and scheduled events.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.events.clear();
        self.timers.clear();
        self.players.clear();
        self.npcs.clear();
        self.items.clear();
        self.breakables.clear();
        self.portals.clear();
        self.interacts.clear();
        self.properties.clear();
        self.objects.clear();
        self.plots.clear();
        tracing::debug!(
            map_id = %self.map_id(),
            instance_id = %self.instance_id,
            "Field disposed"
        );
    }
}
