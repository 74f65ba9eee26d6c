//! Channel-backed session outbound.

use fieldhost_shared::ServerMessage;
use tokio::sync::mpsc;

use crate::infrastructure::ports::SessionOutbound;

/// Forwards notifications into a bounded channel drained by the transport.
pub struct ChannelOutbound {
    sender: mpsc::Sender<ServerMessage>,
}

impl ChannelOutbound {
    pub fn new(sender: mpsc::Sender<ServerMessage>) -> Self {
        Self { sender }
    }

    /// Create an outbound together with the receiving end.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ServerMessage>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self::new(sender), receiver)
    }
}

impl SessionOutbound for ChannelOutbound {
    fn send(&self, message: ServerMessage) {
        if let Err(e) = self.sender.try_send(message) {
            tracing::warn!(error = %e, "Failed to deliver session message");
        }
    }
}
