//! UI components module
//!
//! This module provides the building blocks of the session screen.

pub mod alert_banner;
pub mod call_controls;
pub mod companion_card;
pub mod preferences_panel;
pub mod session_view;
pub mod transcript_view;

pub use alert_banner::AlertBanner;
pub use call_controls::CallControls;
pub use companion_card::CompanionCard;
pub use preferences_panel::PreferencesPanel;
pub use session_view::SessionView;
pub use transcript_view::TranscriptView;
