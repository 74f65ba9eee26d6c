//! Script-facing command and condition surface of a field.
//!
//! A `TriggerContext` is bound to one `FieldManager`. Commands mutate the
//! field's registries and broadcast the result to observers; conditions only
//! read. Ids a script names that the field does not know are skipped.

mod conditions;
mod field;

use std::sync::Arc;

use dashmap::DashMap;
use fieldhost_domain::{TriggerObject, TriggerObjectState};
use fieldhost_shared::TriggerMessage;

use crate::field::{FieldEvent, FieldManager};
use crate::infrastructure::ports::{DropBoxPort, ItemMetadataPort, RandomPort};

/// Object id used as the caster of buffs applied by the field itself.
pub const FIELD_ACTOR_OBJECT_ID: i32 = 0;

pub struct TriggerContext {
    field: Arc<FieldManager>,
    random: Arc<dyn RandomPort>,
    item_metadata: Arc<dyn ItemMetadataPort>,
    drop_boxes: Arc<dyn DropBoxPort>,
}

impl TriggerContext {
    pub fn new(
        field: Arc<FieldManager>,
        random: Arc<dyn RandomPort>,
        item_metadata: Arc<dyn ItemMetadataPort>,
        drop_boxes: Arc<dyn DropBoxPort>,
    ) -> Self {
        Self {
            field,
            random,
            item_metadata,
            drop_boxes,
        }
    }

    pub fn field(&self) -> &Arc<FieldManager> {
        &self.field
    }

    /// `count` ids picked at random when `0 < count < ids.len()`, otherwise
    /// every id in the given order.
    fn random_subset(&self, ids: &[i32], count: i32) -> Vec<i32> {
        let mut ids = ids.to_vec();
        if let Ok(count) = usize::try_from(count) {
            if count > 0 && count < ids.len() {
                self.random.shuffle(&mut ids);
                ids.truncate(count);
            }
        }
        ids
    }

    /// Mutate one trigger object and broadcast its new state.
    ///
    /// `update` reports whether it changed anything; unchanged objects are
    /// not broadcast. Returns whether a broadcast happened.
    fn update_object<T: TriggerObject>(
        &self,
        objects: &DashMap<i32, T>,
        trigger_id: i32,
        update: impl FnOnce(&mut T) -> bool,
    ) -> bool {
        let state = {
            let Some(mut object) = objects.get_mut(&trigger_id) else {
                tracing::debug!(
                    map_id = %self.field.map_id(),
                    trigger_id,
                    "Unknown trigger object"
                );
                return false;
            };
            if !update(object.value_mut()) {
                return false;
            }
            object.to_state()
        };
        self.broadcast_state(state);
        true
    }

    fn broadcast_state(&self, state: TriggerObjectState) {
        self.field.broadcast(TriggerMessage::Update(state));
    }

    /// Show or hide meshes now, or after `delay_ms` through the field's event
    /// queue. Meshes already in the requested visibility are left alone.
    fn update_mesh(&self, trigger_ids: &[i32], visible: bool, fade: i32, delay_ms: i32, scale: f32) {
        for &trigger_id in trigger_ids {
            let current = self
                .field
                .objects()
                .meshes
                .get(&trigger_id)
                .map(|mesh| mesh.visible);
            match current {
                None => {
                    tracing::warn!(map_id = %self.field.map_id(), trigger_id, "Invalid mesh");
                }
                Some(current) if current == visible => {}
                Some(_) if delay_ms > 0 => self.field.schedule(
                    i64::from(delay_ms),
                    FieldEvent::UpdateMesh {
                        trigger_id,
                        visible,
                        fade,
                        scale,
                    },
                ),
                Some(_) => {
                    self.field.apply_mesh_update(trigger_id, visible, fade, scale);
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use fieldhost_shared::ServerMessage;
    use tokio::sync::broadcast;

    use super::TriggerContext;
    use crate::field::FieldManager;
    use crate::infrastructure::clock::ManualClock;
    use crate::infrastructure::ports::RandomPort;
    use crate::test_fixtures::{field_with_layout, sample_layout, test_metadata};

    /// Deterministic "shuffle" that reverses its input.
    pub struct ReverseRandom;

    impl RandomPort for ReverseRandom {
        fn shuffle(&self, values: &mut [i32]) {
            values.reverse();
        }
    }

    pub struct TriggerHarness {
        pub context: TriggerContext,
        pub field: Arc<FieldManager>,
        pub clock: Arc<ManualClock>,
        pub observer: broadcast::Receiver<ServerMessage>,
    }

    impl TriggerHarness {
        /// Everything broadcast since the last drain.
        pub fn drain(&mut self) -> Vec<ServerMessage> {
            let mut messages = Vec::new();
            while let Ok(message) = self.observer.try_recv() {
                messages.push(message);
            }
            messages
        }
    }

    pub fn harness() -> TriggerHarness {
        let (field, clock) = field_with_layout(sample_layout());
        let metadata = Arc::new(test_metadata(sample_layout()));
        let observer = field.subscribe();
        let context = TriggerContext::new(
            field.clone(),
            Arc::new(ReverseRandom),
            metadata.clone(),
            metadata,
        );
        TriggerHarness {
            context,
            field,
            clock,
            observer,
        }
    }
}
