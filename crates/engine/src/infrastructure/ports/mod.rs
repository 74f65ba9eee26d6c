//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Persistence (items, UGC plots)
//! - Static content metadata
//! - Outbound session notifications
//! - Clock/Random (for testing)

mod error;
mod metadata;
mod outbound;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{InventoryRepo, UgcRepo};

// =============================================================================
// Metadata Ports
// =============================================================================
pub use metadata::{DropBoxPort, ItemMetadataPort, MapEntityPort, MapMetadataPort, NpcMetadataPort};

// =============================================================================
// Outbound Ports
// =============================================================================
pub use outbound::SessionOutbound;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockInventoryRepo, MockUgcRepo};

#[cfg(test)]
pub use metadata::{
    MockDropBoxPort, MockItemMetadataPort, MockMapEntityPort, MockMapMetadataPort,
    MockNpcMetadataPort,
};

#[cfg(test)]
pub use outbound::MockSessionOutbound;

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
