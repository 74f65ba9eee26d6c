//! Registry of live field instances.

use std::sync::Arc;

use dashmap::DashMap;
use fieldhost_domain::{InstanceId, MapId};

use crate::field::FieldManager;
use crate::infrastructure::config::FieldConfig;
use crate::infrastructure::ports::{ClockPort, MapEntityPort, MapMetadataPort, NpcMetadataPort};

/// Owns every live `FieldManager`, at most one per (map id, instance id).
pub struct FieldRegistry {
    fields: DashMap<(MapId, InstanceId), Arc<FieldManager>>,
    maps: Arc<dyn MapMetadataPort>,
    entities: Arc<dyn MapEntityPort>,
    npcs: Arc<dyn NpcMetadataPort>,
    clock: Arc<dyn ClockPort>,
    config: FieldConfig,
}

impl FieldRegistry {
    pub fn new(
        maps: Arc<dyn MapMetadataPort>,
        entities: Arc<dyn MapEntityPort>,
        npcs: Arc<dyn NpcMetadataPort>,
        clock: Arc<dyn ClockPort>,
        config: FieldConfig,
    ) -> Self {
        Self {
            fields: DashMap::new(),
            maps,
            entities,
            npcs,
            clock,
            config,
        }
    }

    /// Get the field for a map instance, creating it on first use.
    ///
    /// Creation runs under the entry's shard lock, so racing callers for the
    /// same key all receive the one instance that was built.
    pub fn get(&self, map_id: MapId, instance_id: InstanceId) -> Option<Arc<FieldManager>> {
        let Some(metadata) = self.maps.try_get(map_id) else {
            tracing::error!(map_id = %map_id, instance_id = %instance_id, "MapNotFound");
            return None;
        };

        let entry = self.fields.entry((map_id, instance_id)).or_insert_with(|| {
            let layout = self.entities.get(&metadata.x_block);
            tracing::info!(
                map_id = %map_id,
                instance_id = %instance_id,
                x_block = %metadata.x_block,
                "Creating field"
            );
            Arc::new(FieldManager::new(
                metadata,
                instance_id,
                layout,
                self.npcs.as_ref(),
                self.clock.clone(),
                &self.config,
            ))
        });
        Some(entry.value().clone())
    }

    /// Remove and dispose a single instance.
    pub fn remove(&self, map_id: MapId, instance_id: InstanceId) -> Option<Arc<FieldManager>> {
        let (_, field) = self.fields.remove(&(map_id, instance_id))?;
        field.dispose();
        Some(field)
    }

    /// Remove and dispose `field` only if it is still the registered
    /// instance for its key.
    pub fn evict(&self, field: &Arc<FieldManager>) -> bool {
        let key = (field.map_id(), field.instance_id());
        let removed = self
            .fields
            .remove_if(&key, |_, live| Arc::ptr_eq(live, field))
            .is_some();
        field.dispose();
        removed
    }

    /// Dispose every live field and empty the registry.
    pub fn dispose_all(&self) {
        let fields: Vec<Arc<FieldManager>> = self
            .fields
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        self.fields.clear();

        for field in &fields {
            field.dispose();
        }
        tracing::info!(count = fields.len(), "Disposed all fields");
    }

    /// Run due scheduled events on every live field. Returns how many ran.
    pub fn update_all(&self) -> usize {
        let fields: Vec<Arc<FieldManager>> = self
            .fields
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        fields.iter().map(|field| field.process_events()).sum()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
