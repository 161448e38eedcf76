use super::{EventKind, ListenerId, VoiceClient};
use std::sync::Arc;
use tracing::{debug, warn};

/// Registered listener, removed from the client when dropped
pub struct Subscription {
    client: Arc<dyn VoiceClient>,
    id: ListenerId,
    kind: EventKind,
}

impl Subscription {
    pub fn new(client: Arc<dyn VoiceClient>, id: ListenerId, kind: EventKind) -> Self {
        Self { client, id, kind }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        match self.client.unsubscribe(self.id) {
            Ok(()) => debug!("[RELAY] Removed {} listener", self.kind),
            Err(e) => warn!("[RELAY] Failed to remove {} listener: {}", self.kind, e),
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}
