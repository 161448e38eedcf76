use crate::controller::{AlertLevel, CallController};
use crate::ui::theme::Theme;
use egui::{Color32, RichText};

/// Dismissible banner for connection alerts
pub struct AlertBanner<'a> {
    controller: &'a mut CallController,
    theme: &'a Theme,
}

impl<'a> AlertBanner<'a> {
    pub fn new(controller: &'a mut CallController, theme: &'a Theme) -> Self {
        Self { controller, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let Some(alert) = self.controller.alert().cloned() else {
            return;
        };

        let fill = match alert.level {
            AlertLevel::Warning => self.theme.warning,
            AlertLevel::Terminal => self.theme.error,
        };

        let mut dismissed = false;
        egui::Frame::none()
            .fill(fill.gamma_multiply(0.85))
            .rounding(self.theme.card_rounding)
            .inner_margin(egui::Margin::symmetric(self.theme.spacing, self.theme.spacing_sm))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let label = ui.label(RichText::new(&alert.message).color(Color32::WHITE));
                    label.widget_info(|| {
                        egui::WidgetInfo::labeled(
                            egui::WidgetType::Label,
                            true,
                            format!("Alert: {}", alert.message),
                        )
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            dismissed = true;
                        }
                    });
                });
            });

        if dismissed {
            self.controller.dismiss_alert();
        }
        ui.add_space(self.theme.spacing_sm);
    }
}
