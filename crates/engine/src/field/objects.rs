//! Per-variant trigger object registries of one field.

use dashmap::DashMap;
use fieldhost_domain::{
    TriggerActor, TriggerCamera, TriggerCube, TriggerEffect, TriggerLadder, TriggerMesh,
    TriggerObjectState, TriggerRope, TriggerSound,
};

#[derive(Default)]
pub struct TriggerObjects {
    pub cameras: DashMap<i32, TriggerCamera>,
    pub actors: DashMap<i32, TriggerActor>,
    pub cubes: DashMap<i32, TriggerCube>,
    pub effects: DashMap<i32, TriggerEffect>,
    pub ladders: DashMap<i32, TriggerLadder>,
    pub meshes: DashMap<i32, TriggerMesh>,
    pub ropes: DashMap<i32, TriggerRope>,
    pub sounds: DashMap<i32, TriggerSound>,
}

impl TriggerObjects {
    /// Materialize objects from layout snapshots. Later duplicates of an id win.
    pub fn from_states(states: impl IntoIterator<Item = TriggerObjectState>) -> Self {
        let objects = Self::default();
        for state in states {
            match state {
                TriggerObjectState::Camera(o) => {
                    objects.cameras.insert(o.trigger_id, o);
                }
                TriggerObjectState::Actor(o) => {
                    objects.actors.insert(o.trigger_id, o);
                }
                TriggerObjectState::Cube(o) => {
                    objects.cubes.insert(o.trigger_id, o);
                }
                TriggerObjectState::Effect(o) => {
                    objects.effects.insert(o.trigger_id, o);
                }
                TriggerObjectState::Ladder(o) => {
                    objects.ladders.insert(o.trigger_id, o);
                }
                TriggerObjectState::Mesh(o) => {
                    objects.meshes.insert(o.trigger_id, o);
                }
                TriggerObjectState::Rope(o) => {
                    objects.ropes.insert(o.trigger_id, o);
                }
                TriggerObjectState::Sound(o) => {
                    objects.sounds.insert(o.trigger_id, o);
                }
            }
        }
        objects
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
            + self.actors.len()
            + self.cubes.len()
            + self.effects.len()
            + self.ladders.len()
            + self.meshes.len()
            + self.ropes.len()
            + self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cameras.clear();
        self.actors.clear();
        self.cubes.clear();
        self.effects.clear();
        self.ladders.clear();
        self.meshes.clear();
        self.ropes.clear();
        self.sounds.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldhost_domain::TriggerObject;

    #[test]
    fn states_land_in_their_registry() {
        let objects = TriggerObjects::from_states(vec![
            TriggerMesh::new(1, true).to_state(),
            TriggerCube::new(1, false).to_state(),
            TriggerSound::new(2, true).to_state(),
        ]);
        assert_eq!(objects.len(), 3);
        assert!(objects.meshes.contains_key(&1));
        assert!(objects.cubes.get(&1).is_some_and(|cube| !cube.visible));

        objects.clear();
        assert!(objects.is_empty());
    }
}
