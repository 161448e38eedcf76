//! Session controls
//!
//! Mute toggle, start/end session button and transcript clear button.

use crate::controller::CallController;
use crate::state::CallStatus;
use crate::ui::theme::Theme;
use egui::{Button, Color32, RichText, Vec2};

pub struct CallControls<'a> {
    controller: &'a mut CallController,
    theme: &'a Theme,
}

impl<'a> CallControls<'a> {
    pub fn new(controller: &'a mut CallController, theme: &'a Theme) -> Self {
        Self { controller, theme }
    }

    /// Label of the start/end button for a call phase
    pub fn session_label(status: CallStatus) -> &'static str {
        match status {
            CallStatus::Active => "End Session",
            CallStatus::Connecting => "Connecting...",
            CallStatus::Inactive | CallStatus::Finished => "Start Session",
        }
    }

    /// Label of the mute button
    pub fn mute_label(muted: bool) -> &'static str {
        if muted {
            "Turn on microphone"
        } else {
            "Turn off microphone"
        }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let status = self.controller.status();
        let muted = self.controller.state().muted;
        let button_size = Vec2::new(ui.available_width(), 36.0);

        // Mute is only meaningful while the call is up
        let mute = Button::new(Self::mute_label(muted))
            .rounding(self.theme.button_rounding)
            .min_size(button_size);
        if ui.add_enabled(status.is_active(), mute).clicked() {
            self.controller.toggle_mute();
        }

        ui.add_space(self.theme.spacing_sm);

        let session = Button::new(
            RichText::new(Self::session_label(status))
                .strong()
                .color(Color32::WHITE),
        )
        .fill(self.theme.session_button_color(status))
        .rounding(self.theme.button_rounding)
        .min_size(button_size);

        if ui.add_enabled(!status.is_connecting(), session).clicked() {
            if status.is_active() {
                self.controller.disconnect();
            } else {
                self.controller.start();
            }
        }

        ui.add_space(self.theme.spacing_sm);

        let clear = Button::new("Clear Transcript")
            .rounding(self.theme.button_rounding)
            .min_size(button_size);
        if ui
            .add_enabled(!self.controller.transcript().is_empty(), clear)
            .clicked()
        {
            self.controller.clear_transcript();
        }
    }
}
