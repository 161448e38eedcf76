//! Transcript view
//!
//! Newest message on top, with the in-flight utterance (if any) above it.

use crate::controller::CallController;
use crate::messages::{Message, Role};
use crate::ui::theme::Theme;
use egui::{Align, Color32, RichText};

pub struct TranscriptView<'a> {
    controller: &'a CallController,
    theme: &'a Theme,
}

impl<'a> TranscriptView<'a> {
    pub fn new(controller: &'a CallController, theme: &'a Theme) -> Self {
        Self { controller, theme }
    }

    /// Accessibility label for a transcript entry
    pub fn entry_label(message: &Message) -> String {
        match message.role {
            Role::User => format!("User message: {}", message.content),
            Role::Assistant => format!("Companion message: {}", message.content),
        }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let transcript = self.controller.transcript();
        let partial = self.controller.state().partial.as_ref();

        egui::ScrollArea::vertical()
            .id_salt("transcript")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if transcript.is_empty() && partial.is_none() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(self.theme.spacing_lg);
                        ui.label(
                            RichText::new("Your conversation will appear here.")
                                .size(14.0)
                                .color(self.theme.text_muted),
                        );
                    });
                    return;
                }

                if let Some(partial) = partial {
                    let text = format!("{}...", partial.text);
                    let response = ui.label(
                        RichText::new(&text)
                            .italics()
                            .color(self.theme.text_muted),
                    );
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(
                            egui::WidgetType::Label,
                            true,
                            format!("Partial transcript: {}", partial.text),
                        )
                    });
                    ui.add_space(self.theme.spacing_sm);
                }

                for message in transcript.iter() {
                    self.show_message(ui, message);
                    ui.add_space(self.theme.spacing_sm);
                }
            });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message) {
        let props = self.controller.props();
        let is_user = message.role == Role::User;

        let (sender, fill, text_color, align) = if is_user {
            (props.user_name.as_str(), self.theme.user_bubble, Color32::WHITE, Align::RIGHT)
        } else {
            (
                props.name.as_str(),
                self.theme.assistant_bubble,
                self.theme.text_primary,
                Align::LEFT,
            )
        };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(format!(
                    "{}  {}",
                    sender,
                    message.timestamp.format("%H:%M:%S")
                ))
                .size(11.0)
                .color(self.theme.text_muted),
            );

            let max_width = ui.available_width() * 0.8;
            egui::Frame::none()
                .fill(fill)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    let label = Self::entry_label(message);
                    let response = ui.label(RichText::new(&message.content).color(text_color));
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label)
                    });
                });
        });
    }
}
