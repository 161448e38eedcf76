//! Main Converso application struct and eframe integration
//!
//! This module contains the CompanionApp that implements eframe::App.

use crate::controller::CallController;
use crate::ui::components::SessionView;
use crate::ui::shortcuts::read_shortcuts;
use crate::ui::theme::Theme;
use egui::{CentralPanel, RichText, TopBottomPanel};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How often to poll the voice client while a call is in progress
const LIVE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main Converso application
pub struct CompanionApp {
    /// Whether the app has been initialized
    initialized: bool,
    /// Session controller
    controller: CallController,
    /// UI theme
    theme: Theme,
}

impl CompanionApp {
    /// Create a new Converso application
    pub fn new(cc: &eframe::CreationContext<'_>, controller: CallController) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self {
            initialized: false,
            controller,
            theme,
        }
    }

    pub fn controller(&self) -> &CallController {
        &self.controller
    }

    /// Initialize the application (called on first frame)
    fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        info!(
            "Converso UI initialized for companion {} ({})",
            self.controller.props().name,
            self.controller.props().companion_id
        );
    }

    /// Apply keyboard shortcuts pressed this frame
    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        for shortcut in read_shortcuts(ctx) {
            if self.controller.handle_shortcut(shortcut) {
                debug!("[UI] Shortcut {:?} applied", shortcut);
            }
        }
    }

    /// Show the top header bar
    fn show_header(&self, ctx: &egui::Context) {
        let state = self.controller.state();

        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Converso")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.label(
                        RichText::new(state.status.to_string())
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if state.status.in_progress() {
                            ui.label(
                                RichText::new(format!("Connection: {}", state.quality))
                                    .size(12.0)
                                    .color(self.theme.quality_color(state.quality)),
                            );
                        }
                        if state.muted {
                            ui.label(
                                RichText::new("Muted")
                                    .size(12.0)
                                    .color(self.theme.warning),
                            );
                        }
                    });
                });
            });
    }

    /// Schedule the next frame so events and timers keep flowing
    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        if self.controller.status().in_progress() {
            ctx.request_repaint_after(LIVE_POLL_INTERVAL);
        } else if let Some(deadline) = self.controller.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}

impl eframe::App for CompanionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Initialize on first frame
        self.initialize();

        // Fold in voice client replies, events and due timers
        let now = Instant::now();
        self.controller.poll(now);

        self.handle_shortcuts(ctx);

        self.show_header(ctx);
        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                SessionView::new(&mut self.controller, &self.theme).show(ui);
            });

        self.schedule_repaint(ctx, now);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.unmount();
        info!("Converso shutting down");
    }
}
