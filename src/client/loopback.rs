//! In-process voice client
//!
//! Stands in for the real SDK when running the app offline and in tests.
//! It records every call made to it, lets the host inject events, and can be
//! told to reject upcoming start/stop requests.

use super::{
    AssistantConfig, AssistantOverrides, EventKind, ListenerId, Reply, VoiceClient, VoiceEvent,
};
use crate::{ConversoError, Result};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info};

#[derive(Default)]
struct LoopbackInner {
    listeners: Vec<(ListenerId, EventKind, Sender<VoiceEvent>)>,
    next_id: u64,
    muted: bool,
    auto_connect: bool,
    start_outcomes: VecDeque<Result<()>>,
    stop_outcomes: VecDeque<Result<()>>,
    failing_kinds: HashSet<EventKind>,
    start_calls: Vec<AssistantOverrides>,
    stop_calls: usize,
}

/// Loopback implementation of [`VoiceClient`]
#[derive(Default)]
pub struct LoopbackClient {
    inner: Mutex<LoopbackInner>,
}

impl LoopbackClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit call-start on every accepted start and call-end on every accepted stop
    pub fn with_auto_connect(self, enabled: bool) -> Self {
        self.inner.lock().auto_connect = enabled;
        self
    }

    /// Reject the next start request with `reason`
    pub fn fail_next_start(&self, reason: impl Into<String>) {
        self.inner
            .lock()
            .start_outcomes
            .push_back(Err(ConversoError::StartFailed(reason.into())));
    }

    /// Reject the next stop request with `reason`
    pub fn fail_next_stop(&self, reason: impl Into<String>) {
        self.inner
            .lock()
            .stop_outcomes
            .push_back(Err(ConversoError::StopFailed(reason.into())));
    }

    /// Refuse listener registration for `kind`
    pub fn fail_subscriptions_for(&self, kind: EventKind) {
        self.inner.lock().failing_kinds.insert(kind);
    }

    /// Deliver an event to every listener of its kind; returns how many got it
    pub fn emit(&self, event: VoiceEvent) -> usize {
        let targets: Vec<Sender<VoiceEvent>> = {
            let inner = self.inner.lock();
            inner
                .listeners
                .iter()
                .filter(|(_, kind, _)| *kind == event.kind())
                .map(|(_, _, tx)| tx.clone())
                .collect()
        };

        targets
            .iter()
            .filter(|tx| tx.send(event.clone()).is_ok())
            .count()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }

    pub fn start_calls(&self) -> usize {
        self.inner.lock().start_calls.len()
    }

    /// Overrides passed to the most recent start request
    pub fn last_overrides(&self) -> Option<AssistantOverrides> {
        self.inner.lock().start_calls.last().cloned()
    }

    pub fn stop_calls(&self) -> usize {
        self.inner.lock().stop_calls
    }
}

impl VoiceClient for LoopbackClient {
    fn start(&self, assistant: &AssistantConfig, overrides: &AssistantOverrides) -> Reply {
        let (outcome, auto_connect) = {
            let mut inner = self.inner.lock();
            inner.start_calls.push(overrides.clone());
            (inner.start_outcomes.pop_front().unwrap_or(Ok(())), inner.auto_connect)
        };

        info!(
            "[LOOPBACK] start: assistant={}, voice={}, ok={}",
            assistant.name,
            assistant.voice.voice_id,
            outcome.is_ok()
        );

        if outcome.is_ok() && auto_connect {
            self.emit(VoiceEvent::CallStart);
        }
        Reply::ready(outcome)
    }

    fn stop(&self) -> Reply {
        let (outcome, auto_connect) = {
            let mut inner = self.inner.lock();
            inner.stop_calls += 1;
            (inner.stop_outcomes.pop_front().unwrap_or(Ok(())), inner.auto_connect)
        };

        info!("[LOOPBACK] stop: ok={}", outcome.is_ok());

        if outcome.is_ok() && auto_connect {
            self.emit(VoiceEvent::CallEnd);
        }
        Reply::ready(outcome)
    }

    fn is_muted(&self) -> bool {
        self.inner.lock().muted
    }

    fn set_muted(&self, muted: bool) {
        self.inner.lock().muted = muted;
    }

    fn subscribe(&self, kind: EventKind, tx: Sender<VoiceEvent>) -> Result<ListenerId> {
        let mut inner = self.inner.lock();
        if inner.failing_kinds.contains(&kind) {
            return Err(ConversoError::ListenerError(format!(
                "{} listener rejected",
                kind
            )));
        }
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        inner.listeners.push((id, kind, tx));
        debug!("[LOOPBACK] subscribed {} as {:?}", kind, id);
        Ok(id)
    }

    fn unsubscribe(&self, id: ListenerId) -> Result<()> {
        let mut inner = self.inner.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|(lid, _, _)| *lid != id);
        if inner.listeners.len() == before {
            return Err(ConversoError::ListenerError(format!(
                "unknown listener {:?}",
                id
            )));
        }
        Ok(())
    }
}
