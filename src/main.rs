//! Desktop front-end for a local video download backend

// egui window and event dispatch
mod app;
// Backend address and local folder settings
mod config;
// Error taxonomy and user-facing messages
mod error;
// HTTP calls to the backend
mod gateway;
// Wire types for the backend API
mod model;
// Quality bucketing, dedup and sorting of format lists
mod normalizer;
// Phase state machine
mod session;
// Row descriptors for rendering
mod view;

use std::sync::Arc;

use anyhow::Context;
use eframe::egui::Visuals;
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::FormatPickerApp;
use config::BackendConfig;
use gateway::Gateway;

/// Program entry point: sets up logging and the runtime, then launches the GUI
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Network calls run here; the UI thread only polls for their replies
    let runtime = Runtime::new().context("failed to start the tokio runtime")?;

    let config = BackendConfig::from_env();
    info!(backend = %config.base_url, folder = %config.download_folder, "starting");
    let gateway = Arc::new(Gateway::new(config));
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Video Downloader",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(Visuals::dark());
            Box::new(FormatPickerApp::new(gateway, handle))
        }),
    )
    .map_err(|e| anyhow::anyhow!("window closed with an error: {e}"))
}
