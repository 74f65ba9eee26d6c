//! fieldhost Shared - notifications sent from the engine to sessions
//!
//! This crate contains no behavior. Wire encoding of these messages lives in
//! the transport layer; here they are plain serde-serializable enums.

pub mod messages;

pub use messages::{
    BreakableMessage, BuffMessage, CameraMessage, CubeMessage, FieldMessage,
    FieldPropertyMessage, InteractMessage, ItemInventoryErrorCode, ItemInventoryMessage,
    PortalMessage, ServerMessage, TriggerMessage,
};
