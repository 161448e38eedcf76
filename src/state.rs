//! Session state for a companion voice call
//!
//! `SessionState` is the single source of truth the view renders from. It is
//! owned by the [`CallController`](crate::controller::CallController) and only
//! mutated on the UI thread, either by user actions or by folding in voice
//! client events.

use crate::messages::Role;
use serde::{Deserialize, Serialize};

/// Call lifecycle phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CallStatus {
    /// No call, ready to start
    #[default]
    Inactive,
    /// Start requested, waiting for the client to confirm
    Connecting,
    /// Call in progress
    Active,
    /// Call ended, can be replayed
    Finished,
}

impl CallStatus {
    /// Check if a new call may be started from this phase
    pub fn can_start(&self) -> bool {
        matches!(self, CallStatus::Inactive | CallStatus::Finished)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, CallStatus::Active)
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, CallStatus::Connecting)
    }

    /// Check if a call is connecting or running
    pub fn in_progress(&self) -> bool {
        matches!(self, CallStatus::Connecting | CallStatus::Active)
    }
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallStatus::Inactive => write!(f, "Inactive"),
            CallStatus::Connecting => write!(f, "Connecting"),
            CallStatus::Active => write!(f, "Active"),
            CallStatus::Finished => write!(f, "Finished"),
        }
    }
}

/// Connection quality reported by the voice client
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionQuality {
    #[default]
    Good,
    Fair,
    Poor,
}

impl std::fmt::Display for ConnectionQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionQuality::Good => write!(f, "good"),
            ConnectionQuality::Fair => write!(f, "fair"),
            ConnectionQuality::Poor => write!(f, "poor"),
        }
    }
}

/// The one unfinalized utterance currently being transcribed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialInput {
    pub role: Role,
    pub text: String,
}

/// Live state of the current session
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    /// Call lifecycle phase
    pub status: CallStatus,
    /// Microphone muted
    pub muted: bool,
    /// Last reported volume, 0.0 to 1.0
    pub audio_level: f32,
    /// Connection quality indicator
    pub quality: ConnectionQuality,
    /// Automatic reconnection attempts made so far
    pub retry_count: u8,
    /// Companion is talking
    pub speaking: bool,
    /// User audio is being captured
    pub listening: bool,
    /// In-flight utterance, if any
    pub partial: Option<PartialInput>,
}

impl SessionState {
    /// Create a new default state
    pub fn new() -> Self {
        Self::default()
    }

    // === State transitions ===

    /// Start request sent, waiting for the call to come up
    pub fn begin_connecting(&mut self) {
        self.status = CallStatus::Connecting;
    }

    /// Call confirmed by the client
    pub fn connected(&mut self) {
        self.status = CallStatus::Active;
        self.retry_count = 0;
        self.quality = ConnectionQuality::Good;
    }

    /// Call over, transcript kept for review
    pub fn finish(&mut self) {
        self.status = CallStatus::Finished;
        self.clear_activity();
    }

    /// Back to idle after a failed start
    pub fn revert_to_inactive(&mut self) {
        self.status = CallStatus::Inactive;
        self.clear_activity();
    }

    /// Set the audio level, clamped to 0.0..=1.0
    pub fn set_audio_level(&mut self, level: f32) {
        self.audio_level = if level.is_finite() {
            level.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    fn clear_activity(&mut self) {
        self.speaking = false;
        self.listening = false;
        self.audio_level = 0.0;
        self.partial = None;
    }
}
