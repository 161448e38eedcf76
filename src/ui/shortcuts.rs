//! Keyboard shortcut mapping
//!
//! Ctrl+Space toggles mute, Escape ends the session, Ctrl+Enter starts one.

use crate::controller::Shortcut;
use egui::{Event, Key, Modifiers};

/// Map a key press to a shortcut
pub fn shortcut_for(key: Key, modifiers: Modifiers) -> Option<Shortcut> {
    match key {
        Key::Space if modifiers.ctrl => Some(Shortcut::ToggleMute),
        Key::Enter if modifiers.ctrl => Some(Shortcut::StartSession),
        Key::Escape => Some(Shortcut::EndSession),
        _ => None,
    }
}

/// Shortcuts pressed during this frame, in input order
pub fn read_shortcuts(ctx: &egui::Context) -> Vec<Shortcut> {
    ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    modifiers,
                    ..
                } => shortcut_for(*key, *modifiers),
                _ => None,
            })
            .collect()
    })
}
