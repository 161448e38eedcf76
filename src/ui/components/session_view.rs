//! Session screen layout
//!
//! Left column: companion, controls and (when idle) preferences.
//! Right column: transcript.

use crate::controller::CallController;
use crate::ui::components::{
    AlertBanner, CallControls, CompanionCard, PreferencesPanel, TranscriptView,
};
use crate::ui::theme::Theme;
use egui::RichText;

pub struct SessionView<'a> {
    controller: &'a mut CallController,
    theme: &'a Theme,
}

impl<'a> SessionView<'a> {
    pub fn new(controller: &'a mut CallController, theme: &'a Theme) -> Self {
        Self { controller, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let controller = self.controller;
        let theme = self.theme;

        AlertBanner::new(controller, theme).show(ui);

        ui.columns(2, |columns| {
            let left = &mut columns[0];
            CompanionCard::new(controller, theme).show(left);
            left.add_space(theme.spacing);
            CallControls::new(controller, theme).show(left);

            if let Some(preferences) = controller.preferences_mut() {
                left.add_space(theme.spacing);
                PreferencesPanel::new(preferences, theme).show(left);
            }

            left.add_space(theme.spacing);
            left.label(
                RichText::new("Ctrl+Enter start   Ctrl+Space mute   Esc end")
                    .size(11.0)
                    .color(theme.text_muted.gamma_multiply(0.7)),
            );

            TranscriptView::new(controller, theme).show(&mut columns[1]);
        });
    }
}
