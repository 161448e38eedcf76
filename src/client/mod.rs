//! Voice client seam
//!
//! The real-time voice SDK (transport, STT, TTS, call signalling) lives behind
//! the [`VoiceClient`] trait. The controller receives it as an injected
//! `Arc<dyn VoiceClient>`, never as a global.
//!
//! Calls that the SDK completes asynchronously return a [`Reply`], which the
//! controller polls on later frames. Events are pushed into crossbeam channels
//! registered per [`EventKind`].

pub mod assistant;
pub mod loopback;
pub mod subscription;

pub use assistant::{AssistantConfig, AssistantOverrides};
pub use loopback::LoopbackClient;
pub use subscription::Subscription;

use crate::messages::Role;
use crate::state::ConnectionQuality;
use crate::{ConversoError, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

/// Identifier for a registered event listener
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The nine event streams the relay listens to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    CallStart,
    CallEnd,
    Message,
    SpeechStart,
    SpeechEnd,
    TranscriptStart,
    TranscriptEnd,
    VolumeLevel,
    ConnectionQualityChange,
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::CallStart,
        EventKind::CallEnd,
        EventKind::Message,
        EventKind::SpeechStart,
        EventKind::SpeechEnd,
        EventKind::TranscriptStart,
        EventKind::TranscriptEnd,
        EventKind::VolumeLevel,
        EventKind::ConnectionQualityChange,
    ];

    /// SDK event name
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::CallStart => "call-start",
            EventKind::CallEnd => "call-end",
            EventKind::Message => "message",
            EventKind::SpeechStart => "speech-start",
            EventKind::SpeechEnd => "speech-end",
            EventKind::TranscriptStart => "transcript-start",
            EventKind::TranscriptEnd => "transcript-end",
            EventKind::VolumeLevel => "volume-level",
            EventKind::ConnectionQualityChange => "connection-quality-change",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Partial vs final transcript
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TranscriptKind {
    Partial,
    Final,
}

/// Transcript fragment carried by a `message` event
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptMessage {
    pub role: Role,
    pub kind: TranscriptKind,
    pub transcript: String,
}

impl TranscriptMessage {
    pub fn partial(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            kind: TranscriptKind::Partial,
            transcript: text.into(),
        }
    }

    pub fn final_(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            kind: TranscriptKind::Final,
            transcript: text.into(),
        }
    }
}

/// Events delivered by the voice client
#[derive(Clone, Debug, PartialEq)]
pub enum VoiceEvent {
    CallStart,
    CallEnd,
    Message(TranscriptMessage),
    /// Companion started talking
    SpeechStart,
    SpeechEnd,
    /// User audio capture window opened
    TranscriptStart,
    TranscriptEnd,
    VolumeLevel(f32),
    ConnectionQualityChange(ConnectionQuality),
}

impl VoiceEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            VoiceEvent::CallStart => EventKind::CallStart,
            VoiceEvent::CallEnd => EventKind::CallEnd,
            VoiceEvent::Message(_) => EventKind::Message,
            VoiceEvent::SpeechStart => EventKind::SpeechStart,
            VoiceEvent::SpeechEnd => EventKind::SpeechEnd,
            VoiceEvent::TranscriptStart => EventKind::TranscriptStart,
            VoiceEvent::TranscriptEnd => EventKind::TranscriptEnd,
            VoiceEvent::VolumeLevel(_) => EventKind::VolumeLevel,
            VoiceEvent::ConnectionQualityChange(_) => EventKind::ConnectionQualityChange,
        }
    }
}

/// Pending outcome of an asynchronous client call
pub struct Reply {
    rx: Receiver<Result<()>>,
}

impl Reply {
    /// Create a reply and the sender that completes it
    pub fn channel() -> (Sender<Result<()>>, Reply) {
        let (tx, rx) = bounded(1);
        (tx, Reply { rx })
    }

    /// Create an already completed reply
    pub fn ready(result: Result<()>) -> Reply {
        let (tx, reply) = Self::channel();
        let _ = tx.send(result);
        reply
    }

    /// Poll without blocking; `None` while the call is still running
    pub fn poll(&self) -> Option<Result<()>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ConversoError::ChannelError(
                "Reply dropped before completion".to_string(),
            ))),
        }
    }
}

impl std::fmt::Debug for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reply").finish_non_exhaustive()
    }
}

/// Real-time voice SDK client
pub trait VoiceClient: Send + Sync {
    /// Start a call with the given assistant and per-call overrides
    fn start(&self, assistant: &AssistantConfig, overrides: &AssistantOverrides) -> Reply;

    /// Stop the current call
    fn stop(&self) -> Reply;

    fn is_muted(&self) -> bool;

    fn set_muted(&self, muted: bool);

    /// Register a listener for one event kind
    fn subscribe(&self, kind: EventKind, tx: Sender<VoiceEvent>) -> Result<ListenerId>;

    /// Remove a previously registered listener
    fn unsubscribe(&self, id: ListenerId) -> Result<()>;
}
