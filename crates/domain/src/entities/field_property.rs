//! Field-wide properties toggled by trigger scripts
//!
//! A field holds at most one property per [`FieldPropertyKind`]; adding a
//! property of a kind already present replaces it.

use serde::{Deserialize, Serialize};

use crate::Vector3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherType {
    Clear,
    Snow,
    HeavySnow,
    Rain,
    HeavyRain,
    SandStorm,
    CherryBlossom,
    LeafFall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPropertyKind {
    LocalCamera,
    LockPlayer,
    AmbientLight,
    DirectionalLight,
    Gravity,
    PhotoStudio,
    HidePlayer,
    Weather,
    SightRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldProperty {
    LocalCamera { enabled: bool },
    LockPlayer,
    AmbientLight { color: Vector3 },
    DirectionalLight { diffuse_color: Vector3, specular_color: Vector3 },
    Gravity { gravity: f32 },
    PhotoStudio { enabled: bool },
    HidePlayer,
    Weather { weather: WeatherType },
    SightRange { range: f32, opacity: u8 },
}

impl FieldProperty {
    pub fn kind(&self) -> FieldPropertyKind {
        match self {
            FieldProperty::LocalCamera { .. } => FieldPropertyKind::LocalCamera,
            FieldProperty::LockPlayer => FieldPropertyKind::LockPlayer,
            FieldProperty::AmbientLight { .. } => FieldPropertyKind::AmbientLight,
            FieldProperty::DirectionalLight { .. } => FieldPropertyKind::DirectionalLight,
            FieldProperty::Gravity { .. } => FieldPropertyKind::Gravity,
            FieldProperty::PhotoStudio { .. } => FieldPropertyKind::PhotoStudio,
            FieldProperty::HidePlayer => FieldPropertyKind::HidePlayer,
            FieldProperty::Weather { .. } => FieldPropertyKind::Weather,
            FieldProperty::SightRange { .. } => FieldPropertyKind::SightRange,
        }
    }
}
