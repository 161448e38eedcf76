//! Event relay between the voice client and the controller
//!
//! On attach the relay registers one listener per [`EventKind`], all feeding a
//! single channel so events keep their delivery order. Each registration is
//! held as a [`Subscription`] guard; dropping the relay removes every listener
//! it managed to register.

use crate::client::{EventKind, Subscription, VoiceClient, VoiceEvent};
use crossbeam_channel::{unbounded, Receiver};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct EventRelay {
    subscriptions: Vec<Subscription>,
    event_rx: Receiver<VoiceEvent>,
}

impl EventRelay {
    /// Register listeners for all event kinds
    ///
    /// A failed registration is logged and skipped; the relay still attaches.
    pub fn attach(client: &Arc<dyn VoiceClient>) -> Self {
        let (event_tx, event_rx) = unbounded();
        let mut subscriptions = Vec::with_capacity(EventKind::ALL.len());

        for kind in EventKind::ALL {
            match client.subscribe(kind, event_tx.clone()) {
                Ok(id) => subscriptions.push(Subscription::new(Arc::clone(client), id, kind)),
                Err(e) => warn!("[RELAY] Failed to register {} listener: {}", kind, e),
            }
        }

        debug!(
            "[RELAY] Attached {}/{} listeners",
            subscriptions.len(),
            EventKind::ALL.len()
        );

        Self {
            subscriptions,
            event_rx,
        }
    }

    /// Take every event delivered since the last drain, in delivery order
    pub fn drain(&self) -> Vec<VoiceEvent> {
        self.event_rx.try_iter().collect()
    }

    pub fn listener_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_listening_to(&self, kind: EventKind) -> bool {
        self.subscriptions.iter().any(|s| s.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LoopbackClient;

    #[test]
    fn test_attach_registers_every_kind() {
        let loopback = Arc::new(LoopbackClient::new());
        let client: Arc<dyn VoiceClient> = loopback.clone();

        let relay = EventRelay::attach(&client);
        assert_eq!(relay.listener_count(), 9);
        assert_eq!(loopback.listener_count(), 9);
    }

    #[test]
    fn test_drop_deregisters_symmetrically() {
        let loopback = Arc::new(LoopbackClient::new());
        let client: Arc<dyn VoiceClient> = loopback.clone();

        {
            let _relay = EventRelay::attach(&client);
            assert_eq!(loopback.listener_count(), 9);
        }
        assert_eq!(loopback.listener_count(), 0);

        // Remounting does not accumulate listeners
        let _again = EventRelay::attach(&client);
        assert_eq!(loopback.listener_count(), 9);
    }

    #[test]
    fn test_failed_registration_does_not_block_attach() {
        let loopback = Arc::new(LoopbackClient::new());
        loopback.fail_subscriptions_for(EventKind::VolumeLevel);
        let client: Arc<dyn VoiceClient> = loopback.clone();

        let relay = EventRelay::attach(&client);
        assert_eq!(relay.listener_count(), 8);
        assert!(!relay.is_listening_to(EventKind::VolumeLevel));
        assert!(relay.is_listening_to(EventKind::CallStart));
    }

    #[test]
    fn test_drain_preserves_delivery_order() {
        let loopback = Arc::new(LoopbackClient::new());
        let client: Arc<dyn VoiceClient> = loopback.clone();
        let relay = EventRelay::attach(&client);

        loopback.emit(VoiceEvent::TranscriptStart);
        loopback.emit(VoiceEvent::VolumeLevel(0.4));
        loopback.emit(VoiceEvent::SpeechStart);

        assert_eq!(
            relay.drain(),
            vec![
                VoiceEvent::TranscriptStart,
                VoiceEvent::VolumeLevel(0.4),
                VoiceEvent::SpeechStart,
            ]
        );
        assert!(relay.drain().is_empty());
    }
}
