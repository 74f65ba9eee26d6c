use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($name:ident, $inner:ty) => {
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $inner {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Field identity
define_id!(MapId, i32);
define_id!(InstanceId, i32);

// Ownership
define_id!(AccountId, i64);
define_id!(CharacterId, i64);

// Items and UGC
define_id!(ItemUid, i64);
define_id!(PlotId, i64);

impl InstanceId {
    /// The shared (non-instanced) copy of a map.
    pub const DEFAULT: InstanceId = InstanceId(0);
}

impl CharacterId {
    /// Owner used for items that are being deleted.
    pub const NONE: CharacterId = CharacterId(0);
}

impl ItemUid {
    /// Uid of an item that has not been persisted yet.
    pub const UNSAVED: ItemUid = ItemUid(0);

    pub fn is_saved(self) -> bool {
        self.0 != 0
    }
}
