//! Voice preferences panel
//!
//! Only shown while no call is in progress.

use crate::messages::{Preferences, VoiceQuality};
use crate::ui::theme::Theme;
use egui::RichText;

pub struct PreferencesPanel<'a> {
    preferences: &'a mut Preferences,
    theme: &'a Theme,
}

impl<'a> PreferencesPanel<'a> {
    pub fn new(preferences: &'a mut Preferences, theme: &'a Theme) -> Self {
        Self { preferences, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.label(
                    RichText::new("Voice preferences")
                        .size(15.0)
                        .strong()
                        .color(self.theme.text_primary),
                );
                ui.add_space(self.theme.spacing_sm);

                ui.checkbox(&mut self.preferences.noise_reduction, "Noise reduction");
                ui.checkbox(&mut self.preferences.echo_cancellation, "Echo cancellation");

                egui::ComboBox::from_label("Voice quality")
                    .selected_text(self.preferences.voice_quality.label())
                    .show_ui(ui, |ui| {
                        for quality in VoiceQuality::ALL {
                            ui.selectable_value(
                                &mut self.preferences.voice_quality,
                                quality,
                                quality.label(),
                            );
                        }
                    });
            });
    }
}
