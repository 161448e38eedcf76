//! Companion and user cards
//!
//! The companion avatar grows a ring scaled by the reported audio level while
//! the companion is speaking. Avatar images are not loaded here; the card
//! draws the initial instead and shows the image reference on hover.

use crate::controller::CallController;
use crate::state::CallStatus;
use crate::ui::theme::Theme;
use egui::{Align2, Color32, FontId, RichText, Sense, Stroke, Vec2};

const AVATAR_RADIUS: f32 = 48.0;
const MAX_RING_GROWTH: f32 = 24.0;

pub struct CompanionCard<'a> {
    controller: &'a CallController,
    theme: &'a Theme,
}

impl<'a> CompanionCard<'a> {
    pub fn new(controller: &'a CallController, theme: &'a Theme) -> Self {
        Self { controller, theme }
    }

    /// Ring radius for an audio level, 0.0 to 1.0
    pub fn ring_radius(audio_level: f32) -> f32 {
        AVATAR_RADIUS + 4.0 + audio_level.clamp(0.0, 1.0) * MAX_RING_GROWTH
    }

    /// Status line shown under the avatar
    pub fn activity_text(controller: &CallController) -> &'static str {
        let state = controller.state();
        match state.status {
            CallStatus::Inactive => "Ready when you are",
            CallStatus::Connecting => "Connecting...",
            CallStatus::Finished => "Session finished",
            CallStatus::Active if state.speaking => "Speaking",
            CallStatus::Active if state.listening => "Listening",
            CallStatus::Active => "Connected",
        }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let props = self.controller.props();
        let state = self.controller.state();

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    let side = (AVATAR_RADIUS + MAX_RING_GROWTH + 8.0) * 2.0;
                    let (rect, _) = ui.allocate_exact_size(Vec2::splat(side), Sense::hover());

                    if ui.is_rect_visible(rect) {
                        let painter = ui.painter();
                        let center = rect.center();

                        if state.status.is_active() && state.speaking {
                            painter.circle_stroke(
                                center,
                                Self::ring_radius(state.audio_level),
                                Stroke::new(3.0, self.theme.speaking),
                            );
                        } else if state.status.is_connecting() {
                            // Pulse while waiting for the call to come up
                            let t = ui.ctx().input(|i| i.time) as f32;
                            let alpha = 0.4 + 0.3 * (t * 3.0).sin();
                            painter.circle_stroke(
                                center,
                                AVATAR_RADIUS + 6.0,
                                Stroke::new(2.0, self.theme.warning.gamma_multiply(alpha)),
                            );
                        }

                        painter.circle_filled(center, AVATAR_RADIUS, self.theme.primary);
                        painter.text(
                            center,
                            Align2::CENTER_CENTER,
                            initial(&props.name),
                            FontId::proportional(36.0),
                            Color32::WHITE,
                        );
                    }

                    ui.label(
                        RichText::new(&props.name)
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.label(
                        RichText::new(format!("{} · {}", props.subject, props.topic))
                            .size(13.0)
                            .color(self.theme.text_muted),
                    );

                    ui.add_space(self.theme.spacing_sm);

                    let activity_color = if state.listening {
                        self.theme.listening
                    } else {
                        self.theme.text_secondary
                    };
                    ui.label(
                        RichText::new(Self::activity_text(self.controller))
                            .size(14.0)
                            .color(activity_color),
                    );
                });
            });

        ui.add_space(self.theme.spacing_sm);
        self.show_user(ui);
    }

    fn show_user(&self, ui: &mut egui::Ui) {
        let props = self.controller.props();

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let (rect, response) =
                        ui.allocate_exact_size(Vec2::splat(32.0), Sense::hover());
                    ui.painter()
                        .circle_filled(rect.center(), 16.0, self.theme.secondary);
                    ui.painter().text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        initial(&props.user_name),
                        FontId::proportional(16.0),
                        Color32::WHITE,
                    );
                    if let Some(image) = &props.user_image {
                        response.on_hover_text(image.as_str());
                    }

                    ui.label(
                        RichText::new(&props.user_name)
                            .size(15.0)
                            .color(self.theme.text_primary),
                    );
                });
            });
    }
}

fn initial(name: &str) -> String {
    name.chars()
        .find(|c| c.is_alphanumeric())
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "?".to_string())
}
