//! Conversation context handed to the voice client
//!
//! Holds the companion's subject and topic, the recent-message window, and
//! the user's local voice preferences.

use super::storage::ContextWindow;
use super::types::Message;
use serde::{Deserialize, Serialize};

/// Voice quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceQuality {
    Low,
    Medium,
    #[default]
    High,
}

impl VoiceQuality {
    pub const ALL: [VoiceQuality; 3] = [VoiceQuality::Low, VoiceQuality::Medium, VoiceQuality::High];

    pub fn label(&self) -> &'static str {
        match self {
            VoiceQuality::Low => "Low",
            VoiceQuality::Medium => "Medium",
            VoiceQuality::High => "High",
        }
    }
}

impl std::fmt::Display for VoiceQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// User-adjustable voice preferences
///
/// Purely local: changes are not pushed to a session that is already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub voice_quality: VoiceQuality,
    pub noise_reduction: bool,
    pub echo_cancellation: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            voice_quality: VoiceQuality::High,
            noise_reduction: true,
            echo_cancellation: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversationContext {
    pub subject: String,
    pub topic: String,
    pub window: ContextWindow,
    pub preferences: Preferences,
}

impl ConversationContext {
    pub fn new(subject: impl Into<String>, topic: impl Into<String>, window_size: usize) -> Self {
        Self {
            subject: subject.into(),
            topic: topic.into(),
            window: ContextWindow::new(window_size),
            preferences: Preferences::default(),
        }
    }

    pub fn remember(&mut self, message: Message) {
        self.window.push(message);
    }
}
