//! Application state and composition.

use std::sync::Arc;

use fieldhost_domain::{CharacterId, InstanceId, MapId, Player};

use crate::field::{FieldError, FieldManager};
use crate::infrastructure::{
    clock::{SeededRandom, SystemClock, SystemRandom},
    config::EngineConfig,
    ports::{
        ClockPort, DropBoxPort, InventoryRepo, ItemMetadataPort, MapEntityPort, MapMetadataPort,
        NpcMetadataPort, RandomPort, RepoError, SessionOutbound, UgcRepo,
    },
};
use crate::session::GameSession;
use crate::stores::{FieldRegistry, SessionStore};
use crate::trigger::TriggerContext;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Map {0} not found")]
    MapNotFound(MapId),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Main application state.
///
/// Owns the live field instances and connected sessions, plus the ports they
/// are built from.
pub struct App {
    pub config: EngineConfig,
    pub repositories: Repositories,
    pub metadata: Metadata,
    pub fields: Arc<FieldRegistry>,
    pub sessions: SessionStore,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

/// Persistence ports.
#[derive(Clone)]
pub struct Repositories {
    pub inventory: Arc<dyn InventoryRepo>,
    pub ugc: Arc<dyn UgcRepo>,
}

impl Repositories {
    /// Both ports served by one backend.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: InventoryRepo + UgcRepo + 'static,
    {
        Self {
            inventory: backend.clone(),
            ugc: backend,
        }
    }
}

/// Static content ports.
#[derive(Clone)]
pub struct Metadata {
    pub maps: Arc<dyn MapMetadataPort>,
    pub entities: Arc<dyn MapEntityPort>,
    pub npcs: Arc<dyn NpcMetadataPort>,
    pub items: Arc<dyn ItemMetadataPort>,
    pub drop_boxes: Arc<dyn DropBoxPort>,
}

impl Metadata {
    /// Every port served by one content source.
    pub fn from_source<S>(source: Arc<S>) -> Self
    where
        S: MapMetadataPort
            + MapEntityPort
            + NpcMetadataPort
            + ItemMetadataPort
            + DropBoxPort
            + 'static,
    {
        Self {
            maps: source.clone(),
            entities: source.clone(),
            npcs: source.clone(),
            items: source.clone(),
            drop_boxes: source,
        }
    }
}

impl App {
    /// Build the app on the system clock. Trigger randomness is seeded when
    /// the config carries a seed.
    pub fn new(config: EngineConfig, repositories: Repositories, metadata: Metadata) -> Self {
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
        let random: Arc<dyn RandomPort> = match config.random_seed {
            Some(seed) => Arc::new(SeededRandom::new(seed)),
            None => Arc::new(SystemRandom::new()),
        };
        Self::with_ports(config, repositories, metadata, clock, random)
    }

    pub fn with_ports(
        config: EngineConfig,
        repositories: Repositories,
        metadata: Metadata,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let fields = Arc::new(FieldRegistry::new(
            metadata.maps.clone(),
            metadata.entities.clone(),
            metadata.npcs.clone(),
            clock.clone(),
            config.field.clone(),
        ));

        Self {
            config,
            repositories,
            metadata,
            fields,
            sessions: SessionStore::new(),
            clock,
            random,
        }
    }

    // =========================================================================
    // Fields
    // =========================================================================

    /// Get or create a field instance with its plots hydrated. Every caller
    /// waits for the one plot load; if it fails the instance is torn down so a
    /// later call starts over.
    pub async fn enter_field(
        &self,
        map_id: MapId,
        instance_id: InstanceId,
    ) -> Result<Arc<FieldManager>, AppError> {
        let field = self
            .fields
            .get(map_id, instance_id)
            .ok_or(AppError::MapNotFound(map_id))?;

        if let Err(e) = field
            .ensure_plots_loaded(self.repositories.ugc.as_ref())
            .await
        {
            if self.fields.evict(&field) {
                tracing::warn!(
                    map_id = %map_id,
                    instance_id = %instance_id,
                    "Field torn down after plot load failure"
                );
            }
            return Err(e.into());
        }
        Ok(field)
    }

    pub fn trigger_context(&self, field: Arc<FieldManager>) -> TriggerContext {
        TriggerContext::new(
            field,
            self.random.clone(),
            self.metadata.items.clone(),
            self.metadata.drop_boxes.clone(),
        )
    }

    /// Run due scheduled events on every live field.
    pub fn tick(&self) -> usize {
        self.fields.update_all()
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    pub async fn open_session(
        &self,
        player: Player,
        outbound: Arc<dyn SessionOutbound>,
    ) -> Result<Arc<GameSession>, RepoError> {
        let session = Arc::new(
            GameSession::open(
                player,
                self.repositories.inventory.clone(),
                self.metadata.items.clone(),
                outbound,
                self.clock.clone(),
                self.config.inventory.clone(),
            )
            .await?,
        );

        if self.sessions.insert(session.clone()).is_some() {
            tracing::warn!(
                character_id = %session.character_id(),
                "Replaced an existing session"
            );
        }
        Ok(session)
    }

    /// Drop a session and persist its inventory. Returns the final character
    /// record (unlocks, currency) for the caller to store, or `None` when no
    /// session was open.
    pub async fn close_session(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<Player>, RepoError> {
        let Some(session) = self.sessions.remove(character_id) else {
            return Ok(None);
        };
        let player = session.save(self.repositories.inventory.as_ref()).await?;
        tracing::info!(character_id = %character_id, "Session closed");
        Ok(Some(player))
    }

    /// Save every session, then dispose every field.
    pub async fn shutdown(&self) -> Result<(), RepoError> {
        let saved = self
            .sessions
            .save_all(self.repositories.inventory.as_ref())
            .await;
        self.fields.dispose_all();
        saved
    }
}
