//! fieldhost Engine library.
//!
//! Live, in-memory game state for a map server.
//!
//! ## Structure
//!
//! - `field/` - A running map instance and its entity registries
//! - `trigger/` - Script commands and conditions against one field
//! - `inventory/` - Per-session inventory with persistence
//! - `stores/` - Registries of live fields and connected sessions
//! - `infrastructure/` - Ports plus clock, config, in-memory and channel adapters
//! - `app` - Application composition

pub mod app;
pub mod field;
pub mod infrastructure;
pub mod inventory;
pub mod session;
pub mod stores;
pub mod trigger;

/// Test fixtures shared by the unit tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::{App, AppError, Metadata, Repositories};
