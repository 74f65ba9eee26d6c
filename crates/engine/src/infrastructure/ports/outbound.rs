//! Outbound notification port for a single session.

use fieldhost_shared::ServerMessage;

/// Fire-and-forget delivery to one session. Delivery failures are the
/// adapter's concern and never surface to the caller.
#[cfg_attr(test, mockall::automock)]
pub trait SessionOutbound: Send + Sync {
    fn send(&self, message: ServerMessage);
}
