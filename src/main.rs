//! Converso - companion voice sessions
//!
//! Main entry point. Usage: `converso [companion.toml]`
//!
//! Runs against the in-process loopback client; a real voice SDK binding
//! plugs in through the `VoiceClient` trait.

use anyhow::Result;
use converso::ui::CompanionApp;
use converso::{CallController, CompanionProps, ControllerConfig, LoopbackClient, MemoryHistory};
use eframe::egui;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "converso=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Converso");

    let props = match std::env::args().nth(1) {
        Some(path) => match CompanionProps::load(&path) {
            Ok(props) => props,
            Err(e) => {
                warn!("{}; falling back to the demo companion", e);
                CompanionProps::default()
            }
        },
        None => CompanionProps::default(),
    };

    let client = Arc::new(LoopbackClient::new().with_auto_connect(true));
    let history = Arc::new(MemoryHistory::new());
    let controller = CallController::new(client, history, props, ControllerConfig::default());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([640.0, 420.0])
            .with_title("Converso"),
        ..Default::default()
    };

    eframe::run_native(
        "Converso",
        options,
        Box::new(|cc| Ok(Box::new(CompanionApp::new(cc, controller)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))
}
