//! Shared builders for engine unit tests.
//!
//! Everything here is deterministic: fields run on a [`ManualClock`] and the
//! sample layout is small enough to reason about by hand.

use std::sync::{Arc, Mutex, PoisonError};

use fieldhost_domain::{
    AccountId, CharacterId, DropBoxItem, EventSpawnPointItem, FieldBreakable, FieldInteract,
    FieldPortal, Home, HomePlot, InstanceId, InteractState, InventoryTab, ItemMetadata,
    MapEntityLayout, MapId, MapMetadata, NpcKind, NpcMetadata, NpcSpawn, Player, TriggerActor,
    TriggerBox, TriggerCamera, TriggerCube, TriggerEffect, TriggerLadder, TriggerMesh,
    TriggerObjectState, TriggerRope, TriggerSound, Vector3,
};
use fieldhost_shared::{ItemInventoryMessage, ServerMessage};
use tokio::sync::RwLock;

use crate::field::FieldManager;
use crate::infrastructure::clock::ManualClock;
use crate::infrastructure::config::{FieldConfig, InventoryConfig};
use crate::infrastructure::memory::{InMemoryMetadata, InMemoryStorage};
use crate::infrastructure::ports::SessionOutbound;
use crate::inventory::InventoryManager;
use crate::session::GameSession;

pub const TEST_MAP_ID: MapId = MapId::new(2000062);
pub const TEST_X_BLOCK: &str = "test_field";
pub const TEST_CHARACTER_ID: CharacterId = CharacterId::new(1001);
pub const TEST_ACCOUNT_ID: AccountId = AccountId::new(1);
/// Milliseconds since the epoch every manual clock starts at.
pub const TEST_START_MILLIS: i64 = 1_700_000_000_000;

pub const GEAR_ITEM_ID: i32 = 11300001;
pub const POTION_ITEM_ID: i32 = 20000001;
pub const MISC_ITEM_ID: i32 = 30000001;
pub const FRIENDLY_NPC_ID: i32 = 11000001;
pub const MONSTER_NPC_ID: i32 = 21000001;
pub const DROP_BOX_ID: i32 = 9001;

// =============================================================================
// Metadata
// =============================================================================

pub fn test_map() -> MapMetadata {
    MapMetadata {
        id: TEST_MAP_ID,
        name: "Trigger Test Field".to_string(),
        x_block: TEST_X_BLOCK.to_string(),
    }
}

/// Box 101 is a 200-unit cube at the origin. Trigger object ids by family:
/// meshes 3001-3005, cubes 3101-3106, then one camera, actor, effect,
/// ladder, rope and sound at 3201, 3301, ... 3701.
pub fn sample_layout() -> MapEntityLayout {
    let mut trigger_objects: Vec<TriggerObjectState> = (3001..=3005)
        .map(|id| TriggerObjectState::Mesh(TriggerMesh::new(id, true)))
        .collect();
    trigger_objects.extend((3101..=3106).map(|id| TriggerObjectState::Cube(TriggerCube::new(id, true))));
    trigger_objects.extend([
        TriggerObjectState::Camera(TriggerCamera::new(3201, false)),
        TriggerObjectState::Actor(TriggerActor::new(3301, true, "Idle_A")),
        TriggerObjectState::Effect(TriggerEffect::new(3401, false)),
        TriggerObjectState::Ladder(TriggerLadder::new(3501, false)),
        TriggerObjectState::Rope(TriggerRope::new(3601, false)),
        TriggerObjectState::Sound(TriggerSound::new(3701, false)),
    ]);

    MapEntityLayout {
        x_block: TEST_X_BLOCK.to_string(),
        trigger_objects,
        portals: vec![FieldPortal::new(201, 2000001, Vector3::new(0.0, 300.0, 0.0))],
        breakables: vec![FieldBreakable::new(401), FieldBreakable::new(402)],
        interacts: vec![
            FieldInteract {
                id: 601,
                state: InteractState::Reactable,
            },
            FieldInteract {
                id: 602,
                state: InteractState::Reactable,
            },
        ],
        boxes: vec![TriggerBox::new(
            101,
            Vector3::ZERO,
            Vector3::new(200.0, 200.0, 200.0),
        )],
        item_spawns: vec![
            EventSpawnPointItem {
                id: 501,
                position: Vector3::new(50.0, 0.0, 0.0),
                rotation: Vector3::ZERO,
                individual_drop_box_id: DROP_BOX_ID,
            },
            EventSpawnPointItem {
                id: 502,
                position: Vector3::new(-50.0, 0.0, 0.0),
                rotation: Vector3::ZERO,
                individual_drop_box_id: 0,
            },
        ],
        npc_spawns: vec![
            NpcSpawn {
                npc_id: FRIENDLY_NPC_ID,
                position: Vector3::ZERO,
            },
            NpcSpawn {
                npc_id: MONSTER_NPC_ID,
                position: Vector3::new(20.0, 20.0, 0.0),
            },
        ],
        plots: vec![1, 2],
    }
}

/// Content tables backing the sample layout and inventory tests.
pub fn test_metadata(layout: MapEntityLayout) -> InMemoryMetadata {
    InMemoryMetadata::new()
        .with_map(test_map(), layout)
        .with_npc(NpcMetadata {
            id: FRIENDLY_NPC_ID,
            name: "Guard".to_string(),
            kind: NpcKind::Friendly,
        })
        .with_npc(NpcMetadata {
            id: MONSTER_NPC_ID,
            name: "Mushroom".to_string(),
            kind: NpcKind::Monster,
        })
        .with_item(ItemMetadata {
            id: GEAR_ITEM_ID,
            name: "Iron Sword".to_string(),
            inventory: InventoryTab::Gear,
            stack_limit: 1,
            rarity: 1,
        })
        .with_item(ItemMetadata {
            id: POTION_ITEM_ID,
            name: "Health Potion".to_string(),
            inventory: InventoryTab::Consumable,
            stack_limit: 100,
            rarity: 1,
        })
        .with_item(ItemMetadata {
            id: MISC_ITEM_ID,
            name: "Crystal Shard".to_string(),
            inventory: InventoryTab::Misc,
            stack_limit: 100,
            rarity: 2,
        })
        .with_drop_box(
            DROP_BOX_ID,
            vec![
                DropBoxItem {
                    item_id: MISC_ITEM_ID,
                    amount: 3,
                    rarity: 2,
                },
                DropBoxItem {
                    item_id: POTION_ITEM_ID,
                    amount: 1,
                    rarity: 1,
                },
            ],
        )
}

// =============================================================================
// Fields
// =============================================================================

pub fn field_with_layout(layout: MapEntityLayout) -> (Arc<FieldManager>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at_millis(TEST_START_MILLIS));
    let metadata = test_metadata(MapEntityLayout::empty(TEST_X_BLOCK));
    let field = FieldManager::new(
        test_map(),
        InstanceId::DEFAULT,
        layout,
        &metadata,
        clock.clone(),
        &FieldConfig::default(),
    );
    (Arc::new(field), clock)
}

// =============================================================================
// Sessions
// =============================================================================

/// Outbound that keeps every message for later inspection.
#[derive(Default)]
pub struct RecordingOutbound {
    messages: Mutex<Vec<ServerMessage>>,
}

impl RecordingOutbound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<ServerMessage> {
        std::mem::take(&mut *self.messages.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Drain and keep only inventory notifications.
    pub fn inventory_messages(&self) -> Vec<ItemInventoryMessage> {
        self.take()
            .into_iter()
            .filter_map(|message| match message {
                ServerMessage::Inventory(inner) => Some(inner),
                _ => None,
            })
            .collect()
    }
}

impl SessionOutbound for RecordingOutbound {
    fn send(&self, message: ServerMessage) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }
}

/// Character with 1000 meret whose indoor home is plot 1 of the test map.
pub fn test_player() -> Player {
    Player {
        character_id: TEST_CHARACTER_ID,
        account_id: TEST_ACCOUNT_ID,
        name: "Tester".to_string(),
        home: Home {
            indoor: HomePlot {
                map_id: TEST_MAP_ID,
                number: 1,
            },
            outdoor: Some(HomePlot {
                map_id: MapId::new(2000070),
                number: 4,
            }),
        },
        unlock: Default::default(),
        currency: fieldhost_domain::Currency {
            meret: 1_000,
            meso: 0,
        },
        hot_bar: Default::default(),
    }
}

pub struct InventoryFixture {
    pub manager: InventoryManager,
    pub outbound: Arc<RecordingOutbound>,
    pub player: Arc<RwLock<Player>>,
    pub clock: Arc<ManualClock>,
}

pub async fn inventory_fixture(
    storage: Arc<InMemoryStorage>,
    config: InventoryConfig,
) -> InventoryFixture {
    let outbound = Arc::new(RecordingOutbound::new());
    let player = Arc::new(RwLock::new(test_player()));
    let clock = Arc::new(ManualClock::at_millis(TEST_START_MILLIS));
    let manager = InventoryManager::new(
        player.clone(),
        storage,
        Arc::new(test_metadata(sample_layout())),
        outbound.clone(),
        clock.clone(),
        config,
    )
    .await
    .expect("in-memory inventory loads");
    InventoryFixture {
        manager,
        outbound,
        player,
        clock,
    }
}

pub async fn test_session() -> (GameSession, Arc<RecordingOutbound>) {
    let outbound = Arc::new(RecordingOutbound::new());
    let session = GameSession::open(
        test_player(),
        Arc::new(InMemoryStorage::new()),
        Arc::new(test_metadata(sample_layout())),
        outbound.clone(),
        Arc::new(ManualClock::at_millis(TEST_START_MILLIS)),
        InventoryConfig::default(),
    )
    .await
    .expect("in-memory session opens");
    (session, outbound)
}
