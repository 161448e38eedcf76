//! Call state controller
//!
//! Owns the session lifecycle and everything the view renders:
//!
//! ```text
//! Inactive ──start──▶ Connecting ──call-start──▶ Active ──disconnect──▶ Finished
//!    ▲                    │                                                │
//!    └── start rejected ──┘ (retry after 1000ms × attempt)                 │
//!    └────────────────────────────── start (replay) ◀──────────────────────┘
//! ```
//!
//! A call-end event moves any phase to `Finished`. All mutations happen on
//! the UI thread: either in a user-action method or in [`CallController::poll`],
//! which the host calls once per frame.

use crate::client::{AssistantConfig, AssistantOverrides, Reply, TranscriptKind, VoiceClient, VoiceEvent};
use crate::config::{CompanionProps, ControllerConfig};
use crate::history::SessionHistory;
use crate::messages::{ConversationContext, Message, Preferences, Transcript};
use crate::relay::EventRelay;
use crate::state::{CallStatus, PartialInput, SessionState};
use crate::timer::{retry_delay, RetryTimer, SilenceTimer};
use crate::ConversoError;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Keyboard shortcuts understood by the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl+Space
    ToggleMute,
    /// Escape
    EndSession,
    /// Ctrl+Enter
    StartSession,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertLevel {
    /// Something failed but the controller is still trying
    Warning,
    /// Nothing more will happen without the user
    Terminal,
}

/// User-visible alert
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

pub struct CallController {
    config: ControllerConfig,
    props: CompanionProps,
    client: Arc<dyn VoiceClient>,
    history: Arc<dyn SessionHistory>,
    relay: Option<EventRelay>,

    state: SessionState,
    transcript: Transcript,
    context: ConversationContext,

    silence: SilenceTimer,
    retry: RetryTimer,

    pending_start: Option<Reply>,
    pending_stop: Option<Reply>,
    alert: Option<Alert>,
    /// Set while a started call has not yet been written to history
    history_pending: bool,
}

impl CallController {
    /// Create the controller and attach its event listeners
    pub fn new(
        client: Arc<dyn VoiceClient>,
        history: Arc<dyn SessionHistory>,
        props: CompanionProps,
        config: ControllerConfig,
    ) -> Self {
        let relay = EventRelay::attach(&client);
        let context =
            ConversationContext::new(props.subject.clone(), props.topic.clone(), config.context_window);
        let silence = SilenceTimer::new(config.silence_timeout());

        Self {
            config,
            props,
            client,
            history,
            relay: Some(relay),
            state: SessionState::new(),
            transcript: Transcript::new(),
            context,
            silence,
            retry: RetryTimer::new(),
            pending_start: None,
            pending_stop: None,
            alert: None,
            history_pending: false,
        }
    }

    /// Detach all event listeners and drop pending timers
    pub fn unmount(&mut self) {
        if self.relay.take().is_some() {
            info!("[RELAY] Detached from voice client");
        }
        self.silence.cancel();
        self.retry.cancel();
    }

    pub fn is_mounted(&self) -> bool {
        self.relay.is_some()
    }

    // === User actions ===

    /// Start a session from Inactive or Finished
    ///
    /// A manual start cancels any pending automatic retry and resets the
    /// retry counter.
    pub fn start(&mut self) {
        if !self.state.status.can_start() {
            debug!("[CALL] Cannot start while {}", self.state.status);
            return;
        }
        if self.retry.is_pending() {
            info!("[CALL] Manual start supersedes pending retry");
            self.retry.cancel();
        }
        self.state.retry_count = 0;
        self.alert = None;
        self.begin_start();
    }

    /// End an active session
    ///
    /// The phase moves to Finished even if the client fails to stop.
    pub fn disconnect(&mut self) {
        if !self.state.status.is_active() {
            debug!("[CALL] Cannot disconnect while {}", self.state.status);
            return;
        }
        info!("[CALL] Ending session with {}", self.props.name);
        self.state.finish();
        self.silence.cancel();
        self.pending_stop = Some(self.client.stop());
    }

    /// Toggle the microphone; a no-op unless the session is Active
    pub fn toggle_mute(&mut self) -> bool {
        if !self.state.status.is_active() {
            return false;
        }
        let muted = !self.client.is_muted();
        self.client.set_muted(muted);
        self.state.muted = muted;
        debug!("[CALL] Microphone {}", if muted { "muted" } else { "unmuted" });
        true
    }

    /// Apply a keyboard shortcut; returns true if it did something
    pub fn handle_shortcut(&mut self, shortcut: Shortcut) -> bool {
        match shortcut {
            Shortcut::ToggleMute => self.toggle_mute(),
            Shortcut::EndSession if self.state.status.is_active() => {
                self.disconnect();
                true
            }
            Shortcut::StartSession if self.state.status.can_start() => {
                self.start();
                true
            }
            _ => false,
        }
    }

    /// Clear the transcript and the context window
    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
        self.context.window.clear();
        debug!("[CALL] Transcript cleared");
    }

    /// Voice preferences, editable only while no call is in progress
    pub fn preferences_mut(&mut self) -> Option<&mut Preferences> {
        if self.state.status.can_start() {
            Some(&mut self.context.preferences)
        } else {
            None
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    // === Frame processing ===

    /// Process replies, queued events and due timers
    pub fn poll(&mut self, now: Instant) {
        self.poll_replies(now);

        let events = self
            .relay
            .as_ref()
            .map(EventRelay::drain)
            .unwrap_or_default();
        for event in events {
            self.handle_event(event, now);
        }

        if self.silence.poll(now) {
            debug!("[TIMER] Silence timeout, user stopped speaking");
            self.state.listening = false;
        }

        if self.retry.poll(now) {
            if self.state.status.can_start() {
                info!(
                    "[CALL] Retrying connection ({}/{})",
                    self.state.retry_count, self.config.max_retries
                );
                self.begin_start();
            } else {
                debug!("[CALL] Retry skipped while {}", self.state.status);
            }
        }
    }

    /// Fold one voice client event into the session state
    pub fn handle_event(&mut self, event: VoiceEvent, now: Instant) {
        match event {
            VoiceEvent::CallStart => match self.state.status {
                CallStatus::Connecting => {
                    info!("[CALL] Connected to {}", self.props.name);
                    self.state.connected();
                    self.state.muted = self.client.is_muted();
                    self.retry.cancel();
                    if matches!(self.alert, Some(Alert { level: AlertLevel::Warning, .. })) {
                        self.alert = None;
                    }
                }
                CallStatus::Active => debug!("[CALL] Duplicate call-start ignored"),
                other => debug!("[CALL] Ignoring call-start while {}", other),
            },

            VoiceEvent::CallEnd => {
                if self.state.status != CallStatus::Finished {
                    info!("[CALL] Call ended");
                }
                self.state.finish();
                self.silence.cancel();
                if self.history_pending {
                    self.history_pending = false;
                    self.history.add_to_session_history(&self.props.companion_id);
                }
            }

            VoiceEvent::Message(message) => match message.kind {
                TranscriptKind::Partial => {
                    self.state.partial = Some(PartialInput {
                        role: message.role,
                        text: message.transcript,
                    });
                    self.silence.arm(now);
                }
                TranscriptKind::Final => {
                    let entry = Message::new(message.role, message.transcript);
                    debug!("[RELAY] Final {} transcript at {}", entry.role, entry.iso_timestamp());
                    self.context.remember(entry.clone());
                    self.transcript.push(entry);
                    self.state.partial = None;
                }
            },

            VoiceEvent::SpeechStart => {
                self.state.speaking = true;
                self.state.listening = false;
                self.silence.cancel();
            }

            VoiceEvent::SpeechEnd => {
                self.state.speaking = false;
            }

            VoiceEvent::TranscriptStart => {
                self.state.listening = true;
                self.silence.arm(now);
            }

            VoiceEvent::TranscriptEnd => {
                self.state.listening = false;
                self.silence.cancel();
            }

            VoiceEvent::VolumeLevel(level) => {
                self.state.set_audio_level(level);
            }

            VoiceEvent::ConnectionQualityChange(quality) => {
                if quality != self.state.quality {
                    debug!("[CALL] Connection quality now {}", quality);
                }
                self.state.quality = quality;
            }
        }
    }

    fn begin_start(&mut self) {
        self.state.begin_connecting();
        self.history_pending = true;

        let assistant = AssistantConfig::for_companion(&self.props.voice, &self.props.style);
        let overrides = AssistantOverrides::new(&self.props, &self.context);

        info!(
            "[CALL] Connecting to {} (attempt {})",
            self.props.name,
            self.state.retry_count + 1
        );
        self.pending_start = Some(self.client.start(&assistant, &overrides));
    }

    fn poll_replies(&mut self, now: Instant) {
        if let Some(result) = self.pending_start.as_ref().and_then(Reply::poll) {
            self.pending_start = None;
            match result {
                Ok(()) => debug!("[CALL] Start accepted, waiting for call-start"),
                Err(e) if self.state.status.is_connecting() => self.handle_start_failure(e, now),
                Err(e) => warn!("[CALL] Late start failure ignored while {}: {}", self.state.status, e),
            }
        }

        if let Some(result) = self.pending_stop.as_ref().and_then(Reply::poll) {
            self.pending_stop = None;
            match result {
                Ok(()) => debug!("[CALL] Stop acknowledged"),
                Err(e) => warn!("[CALL] Stop failed, session already finished: {}", e),
            }
        }
    }

    fn handle_start_failure(&mut self, err: ConversoError, now: Instant) {
        error!("[CALL] Start failed: {}", err);
        self.state.revert_to_inactive();
        self.silence.cancel();
        self.history_pending = false;

        if self.state.retry_count < self.config.max_retries {
            let delay = retry_delay(self.config.retry_base_delay(), self.state.retry_count);
            self.state.retry_count += 1;
            self.retry.schedule(now, delay);
            warn!(
                "[CALL] Retry {}/{} in {}ms",
                self.state.retry_count,
                self.config.max_retries,
                delay.as_millis()
            );
            self.alert = Some(Alert {
                level: AlertLevel::Warning,
                message: format!(
                    "Could not connect to your companion. Retrying ({}/{})...",
                    self.state.retry_count, self.config.max_retries
                ),
            });
        } else {
            let exhausted = ConversoError::RetriesExhausted(self.config.max_retries);
            error!("[CALL] {}", exhausted);
            self.retry.cancel();
            self.alert = Some(Alert {
                level: AlertLevel::Terminal,
                message: exhausted.user_message(),
            });
        }
    }

    // === Accessors ===

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> CallStatus {
        self.state.status
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn preferences(&self) -> &Preferences {
        &self.context.preferences
    }

    pub fn props(&self) -> &CompanionProps {
        &self.props
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn silence_timer_pending(&self) -> bool {
        self.silence.is_pending()
    }

    pub fn retry_pending(&self) -> bool {
        self.retry.is_pending()
    }

    /// Earliest timer deadline, for scheduling the next repaint
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.silence.deadline(), self.retry.due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{LoopbackClient, TranscriptMessage};
    use crate::history::MemoryHistory;
    use crate::messages::Role;
    use std::time::Duration;

    fn controller() -> (CallController, Arc<LoopbackClient>, Arc<MemoryHistory>) {
        let client = Arc::new(LoopbackClient::new());
        let history = Arc::new(MemoryHistory::new());
        let controller = CallController::new(
            client.clone(),
            history.clone(),
            CompanionProps::default(),
            ControllerConfig::default(),
        );
        (controller, client, history)
    }

    #[test]
    fn test_start_is_immediately_connecting() {
        let (mut c, client, _) = controller();
        c.start();
        assert_eq!(c.status(), CallStatus::Connecting);
        assert_eq!(client.start_calls(), 1);

        // An accepted reply alone does not activate the call
        c.poll(Instant::now());
        assert_eq!(c.status(), CallStatus::Connecting);
    }

    #[test]
    fn test_start_ignored_while_connecting() {
        let (mut c, client, _) = controller();
        c.start();
        c.start();
        assert_eq!(client.start_calls(), 1);
    }

    #[test]
    fn test_call_start_outside_connecting_is_ignored() {
        let (mut c, _, _) = controller();
        c.handle_event(VoiceEvent::CallStart, Instant::now());
        assert_eq!(c.status(), CallStatus::Inactive);
    }

    #[test]
    fn test_mute_noop_when_not_active() {
        let (mut c, client, _) = controller();
        assert!(!c.toggle_mute());
        assert!(!client.is_muted());

        c.start();
        assert!(!c.handle_shortcut(Shortcut::ToggleMute));
        assert!(!c.state().muted);
    }

    #[test]
    fn test_mute_toggles_when_active() {
        let (mut c, client, _) = controller();
        c.start();
        c.handle_event(VoiceEvent::CallStart, Instant::now());

        assert!(c.toggle_mute());
        assert!(c.state().muted);
        assert!(client.is_muted());
        assert!(c.handle_shortcut(Shortcut::ToggleMute));
        assert!(!c.state().muted);
    }

    #[test]
    fn test_speech_start_cancels_silence_timer() {
        let (mut c, _, _) = controller();
        let now = Instant::now();
        c.handle_event(VoiceEvent::TranscriptStart, now);
        assert!(c.state().listening);
        assert!(c.silence_timer_pending());

        c.handle_event(VoiceEvent::SpeechStart, now);
        assert!(c.state().speaking);
        assert!(!c.state().listening);
        assert!(!c.silence_timer_pending());
    }

    #[test]
    fn test_silence_timeout_clears_listening() {
        let (mut c, _, _) = controller();
        let now = Instant::now();
        c.handle_event(VoiceEvent::TranscriptStart, now);
        c.handle_event(
            VoiceEvent::Message(TranscriptMessage::partial(Role::User, "hel")),
            now + Duration::from_millis(2000),
        );

        c.poll(now + Duration::from_millis(3500));
        assert!(c.state().listening, "partial re-armed the timer");

        c.poll(now + Duration::from_millis(5000));
        assert!(!c.state().listening);
        assert!(!c.silence_timer_pending());
    }

    #[test]
    fn test_preferences_locked_during_call() {
        let (mut c, _, _) = controller();
        assert!(c.preferences_mut().is_some());
        c.start();
        assert!(c.preferences_mut().is_none());
        c.handle_event(VoiceEvent::CallEnd, Instant::now());
        assert!(c.preferences_mut().is_some());
    }

    #[test]
    fn test_volume_and_quality_events() {
        let (mut c, _, _) = controller();
        let now = Instant::now();
        c.handle_event(VoiceEvent::VolumeLevel(0.65), now);
        c.handle_event(
            VoiceEvent::ConnectionQualityChange(crate::state::ConnectionQuality::Poor),
            now,
        );
        assert!((c.state().audio_level - 0.65).abs() < f32::EPSILON);
        assert_eq!(c.state().quality, crate::state::ConnectionQuality::Poor);
    }

    #[test]
    fn test_unmount_detaches_listeners() {
        let (mut c, client, _) = controller();
        assert_eq!(client.listener_count(), 9);
        c.unmount();
        assert!(!c.is_mounted());
        assert_eq!(client.listener_count(), 0);
    }

    #[test]
    fn test_next_deadline_is_earliest() {
        let (mut c, _, _) = controller();
        assert!(c.next_deadline().is_none());
        let now = Instant::now();
        c.handle_event(VoiceEvent::TranscriptStart, now);
        assert_eq!(c.next_deadline(), Some(now + Duration::from_millis(3000)));
    }
}
