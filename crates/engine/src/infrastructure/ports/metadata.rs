//! Read-only content metadata ports.
//!
//! Metadata is loaded once at startup, so these are plain synchronous lookups.

use fieldhost_domain::{DropBoxItem, ItemMetadata, MapEntityLayout, MapId, MapMetadata, NpcMetadata};

#[cfg_attr(test, mockall::automock)]
pub trait MapMetadataPort: Send + Sync {
    fn try_get(&self, map_id: MapId) -> Option<MapMetadata>;
}

#[cfg_attr(test, mockall::automock)]
pub trait MapEntityPort: Send + Sync {
    /// Entity layout of a content block. Unknown blocks yield an empty layout.
    fn get(&self, x_block: &str) -> MapEntityLayout;
}

#[cfg_attr(test, mockall::automock)]
pub trait NpcMetadataPort: Send + Sync {
    fn try_get(&self, npc_id: i32) -> Option<NpcMetadata>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ItemMetadataPort: Send + Sync {
    fn try_get(&self, item_id: i32) -> Option<ItemMetadata>;
}

#[cfg_attr(test, mockall::automock)]
pub trait DropBoxPort: Send + Sync {
    /// Contents of an individual drop box; empty when unknown.
    fn individual_drop_box(&self, box_id: i32) -> Vec<DropBoxItem>;
}
