//! In-memory state storage modules.
//!
//! Stores manage runtime state that lives only as long as the process:
//! - `FieldRegistry` - Live map instances keyed by (map, instance)
//! - `SessionStore` - Connected characters' sessions

pub mod field_registry;
pub mod session;

pub use field_registry::FieldRegistry;
pub use session::SessionStore;
