//! One connected character's live state.

use std::sync::Arc;

use fieldhost_domain::{CharacterId, Home, Player};
use fieldhost_shared::ServerMessage;
use tokio::sync::RwLock;

use crate::infrastructure::config::InventoryConfig;
use crate::infrastructure::ports::{
    ClockPort, InventoryRepo, ItemMetadataPort, RepoError, SessionOutbound,
};
use crate::inventory::InventoryManager;

pub struct GameSession {
    character_id: CharacterId,
    player: Arc<RwLock<Player>>,
    outbound: Arc<dyn SessionOutbound>,
    inventory: InventoryManager,
}

impl GameSession {
    /// Open a session for `player`, loading its inventory from storage.
    pub async fn open(
        player: Player,
        storage: Arc<dyn InventoryRepo>,
        item_metadata: Arc<dyn ItemMetadataPort>,
        outbound: Arc<dyn SessionOutbound>,
        clock: Arc<dyn ClockPort>,
        config: InventoryConfig,
    ) -> Result<Self, RepoError> {
        let character_id = player.character_id;
        let player = Arc::new(RwLock::new(player));
        let inventory = InventoryManager::new(
            player.clone(),
            storage,
            item_metadata,
            outbound.clone(),
            clock,
            config,
        )
        .await?;

        tracing::info!(character_id = %character_id, "Session opened");
        Ok(Self {
            character_id,
            player,
            outbound,
            inventory,
        })
    }

    pub fn character_id(&self) -> CharacterId {
        self.character_id
    }

    pub fn player(&self) -> &Arc<RwLock<Player>> {
        &self.player
    }

    pub async fn home(&self) -> Home {
        self.player.read().await.home.clone()
    }

    pub fn inventory(&self) -> &InventoryManager {
        &self.inventory
    }

    pub fn send(&self, message: impl Into<ServerMessage>) {
        self.outbound.send(message.into());
    }

    /// Persist the inventory and return the character record as of the save.
    ///
    /// Unlocks and currency (changed by `expand`) live outside item storage;
    /// the caller owns persisting the returned record.
    pub async fn save(&self, repo: &dyn InventoryRepo) -> Result<Player, RepoError> {
        self.inventory.save(repo).await?;
        let player = self.player.read().await.clone();
        tracing::debug!(character_id = %self.character_id, "Session saved");
        Ok(player)
    }
}
