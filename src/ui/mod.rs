//! UI components and application module
//!
//! This module provides the egui/eframe-based user interface for Converso.

mod app;
pub mod components;
mod shortcuts;
mod theme;

pub use app::CompanionApp;
pub use components::{
    AlertBanner, CallControls, CompanionCard, PreferencesPanel, SessionView, TranscriptView,
};
pub use shortcuts::{read_shortcuts, shortcut_for};
pub use theme::Theme;
