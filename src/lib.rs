//! Converso - voice-session controller for AI companion conversations
//!
//! This crate drives a voice call between a user and an AI companion through
//! an external real-time voice client, folds the client's events into session
//! state, and renders the live transcript with egui.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod messages;
pub mod relay;
pub mod state;
pub mod timer;
pub mod ui;

// Re-export error types
pub use error::{ConversoError, Result};

pub use client::{LoopbackClient, VoiceClient, VoiceEvent};
pub use config::{CompanionProps, ControllerConfig};
pub use controller::{Alert, AlertLevel, CallController, Shortcut};
pub use history::{MemoryHistory, SessionHistory};
pub use state::{CallStatus, ConnectionQuality, SessionState};
