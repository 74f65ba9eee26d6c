//! Trigger objects - scripted, controllable entities from a map's static layout
//!
//! Every variant carries a trigger id (unique within its variant) and a
//! visibility flag. The engine keeps one registry per variant and broadcasts
//! a [`TriggerObjectState`] snapshot whenever an object changes.

use serde::{Deserialize, Serialize};

/// Capability shared by every trigger object variant.
pub trait TriggerObject {
    fn trigger_id(&self) -> i32;
    fn visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);
    /// Snapshot suitable for broadcasting to field observers.
    fn to_state(&self) -> TriggerObjectState;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerCamera {
    pub trigger_id: i32,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerActor {
    pub trigger_id: i32,
    pub visible: bool,
    pub sequence_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerCube {
    pub trigger_id: i32,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEffect {
    pub trigger_id: i32,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerLadder {
    pub trigger_id: i32,
    pub visible: bool,
    pub animate: bool,
    pub delay: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerMesh {
    pub trigger_id: i32,
    pub visible: bool,
    pub fade: i32,
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRope {
    pub trigger_id: i32,
    pub visible: bool,
    pub animate: bool,
    pub delay: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSound {
    pub trigger_id: i32,
    pub visible: bool,
}

impl TriggerCamera {
    pub fn new(trigger_id: i32, visible: bool) -> Self {
        Self { trigger_id, visible }
    }
}

impl TriggerActor {
    pub fn new(trigger_id: i32, visible: bool, sequence_name: impl Into<String>) -> Self {
        Self {
            trigger_id,
            visible,
            sequence_name: sequence_name.into(),
        }
    }
}

impl TriggerCube {
    pub fn new(trigger_id: i32, visible: bool) -> Self {
        Self { trigger_id, visible }
    }
}

impl TriggerEffect {
    pub fn new(trigger_id: i32, visible: bool) -> Self {
        Self { trigger_id, visible }
    }
}

impl TriggerLadder {
    pub fn new(trigger_id: i32, visible: bool) -> Self {
        Self {
            trigger_id,
            visible,
            animate: false,
            delay: 0,
        }
    }
}

impl TriggerMesh {
    pub fn new(trigger_id: i32, visible: bool) -> Self {
        Self {
            trigger_id,
            visible,
            fade: 0,
            scale: 1.0,
        }
    }
}

impl TriggerRope {
    pub fn new(trigger_id: i32, visible: bool) -> Self {
        Self {
            trigger_id,
            visible,
            animate: false,
            delay: 0,
        }
    }
}

impl TriggerSound {
    pub fn new(trigger_id: i32, visible: bool) -> Self {
        Self { trigger_id, visible }
    }
}

/// Broadcastable snapshot of one trigger object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerObjectState {
    Camera(TriggerCamera),
    Actor(TriggerActor),
    Cube(TriggerCube),
    Effect(TriggerEffect),
    Ladder(TriggerLadder),
    Mesh(TriggerMesh),
    Rope(TriggerRope),
    Sound(TriggerSound),
}

impl TriggerObjectState {
    pub fn trigger_id(&self) -> i32 {
        match self {
            TriggerObjectState::Camera(o) => o.trigger_id,
            TriggerObjectState::Actor(o) => o.trigger_id,
            TriggerObjectState::Cube(o) => o.trigger_id,
            TriggerObjectState::Effect(o) => o.trigger_id,
            TriggerObjectState::Ladder(o) => o.trigger_id,
            TriggerObjectState::Mesh(o) => o.trigger_id,
            TriggerObjectState::Rope(o) => o.trigger_id,
            TriggerObjectState::Sound(o) => o.trigger_id,
        }
    }
}

macro_rules! impl_trigger_object {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl TriggerObject for $ty {
                fn trigger_id(&self) -> i32 {
                    self.trigger_id
                }

                fn visible(&self) -> bool {
                    self.visible
                }

                fn set_visible(&mut self, visible: bool) {
                    self.visible = visible;
                }

                fn to_state(&self) -> TriggerObjectState {
                    TriggerObjectState::$variant(self.clone())
                }
            }
        )*
    };
}

impl_trigger_object! {
    TriggerCamera => Camera,
    TriggerActor => Actor,
    TriggerCube => Cube,
    TriggerEffect => Effect,
    TriggerLadder => Ladder,
    TriggerMesh => Mesh,
    TriggerRope => Rope,
    TriggerSound => Sound,
}
