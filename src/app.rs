//! egui window: draws the session's current phase and dispatches user actions.

use std::{path::PathBuf, sync::Arc};

use eframe::{App, Frame, egui};
use egui::{Color32, RichText};
use rfd::FileDialog;
use tokio::{
    runtime::Handle,
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};
use tracing::info;

use crate::{
    error::AppResult,
    gateway::Gateway,
    model::{DownloadedFile, VideoFormats},
    session::{Phase, SaveStatus, Session},
    view::{self, FormatRow, FormatsView},
};

/// Completed backend round-trips, delivered back to the UI thread
enum Reply {
    Formats(AppResult<VideoFormats>),
    Download(AppResult<DownloadedFile>),
    /// The file the save was started for, and where it was written
    Saved(DownloadedFile, AppResult<PathBuf>),
}

/// Everything the user can ask for
#[derive(Debug, Clone, PartialEq)]
enum UiEvent {
    FetchFormats,
    Download(String),
    Save,
    OpenFolder,
    Reset,
}

/// Application state for the GUI
pub struct FormatPickerApp {
    /// Phase and inputs; the only UI state
    session: Session,
    /// Backend access, shared with spawned round-trips
    gateway: Arc<Gateway>,
    /// Runtime the round-trips are spawned on
    runtime: Handle,
    /// Destination folder for local copies
    download_folder: String,
    /// Cloned into each spawned round-trip
    reply_tx: UnboundedSender<Reply>,
    /// Drained once per frame
    reply_rx: UnboundedReceiver<Reply>,
}

impl FormatPickerApp {
    /// Wire the app to an already-built gateway and runtime
    pub fn new(gateway: Arc<Gateway>, runtime: Handle) -> Self {
        let (reply_tx, reply_rx) = unbounded_channel();
        let download_folder = gateway.config().download_folder.clone();
        Self {
            session: Session::new(),
            gateway,
            runtime,
            download_folder,
            reply_tx,
            reply_rx,
        }
    }

    /// Hand a finished round-trip to the session
    fn apply(&mut self, reply: Reply) {
        match reply {
            Reply::Formats(result) => self.session.formats_loaded(result),
            Reply::Download(result) => self.session.download_finished(result),
            Reply::Saved(file, result) => self.session.save_finished(&file, result),
        }
    }

    /// Dispatch one user action; network work goes to the runtime
    fn handle(&mut self, event: UiEvent, ctx: &egui::Context) {
        match event {
            UiEvent::FetchFormats => {
                // None means the validation error is already on screen.
                let Some(url) = self.session.submit_url() else {
                    return;
                };
                let gateway = Arc::clone(&self.gateway);
                self.spawn(ctx, async move { Reply::Formats(gateway.fetch_formats(&url).await) });
            }
            UiEvent::Download(format_id) => {
                let Some(request) = self.session.begin_download(&format_id) else {
                    return;
                };
                let gateway = Arc::clone(&self.gateway);
                self.spawn(ctx, async move {
                    let result = gateway.start_download(&request).await.map(|resp| DownloadedFile {
                        link: gateway.download_link(&resp.filename),
                        filename: resp.filename,
                    });
                    Reply::Download(result)
                });
            }
            UiEvent::Save => {
                let Some(file) = self.session.begin_save() else {
                    return;
                };
                let gateway = Arc::clone(&self.gateway);
                let folder = PathBuf::from(&self.download_folder);
                self.spawn(ctx, async move {
                    let result = gateway.save_file(&file, &folder).await;
                    Reply::Saved(file, result)
                });
            }
            UiEvent::OpenFolder => open_folder(self.download_folder.clone()),
            UiEvent::Reset => self.session.reset(),
        }
    }

    /// Run one round-trip on the runtime and wake the UI when it lands.
    fn spawn<F>(&self, ctx: &egui::Context, task: F)
    where
        F: std::future::Future<Output = Reply> + Send + 'static,
    {
        let tx = self.reply_tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let _ = tx.send(task.await);
            ctx.request_repaint();
        });
    }
}

impl App for FormatPickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // 1️⃣ Apply any replies that landed since the last frame
        while let Ok(reply) = self.reply_rx.try_recv() {
            self.apply(reply);
        }

        // 2️⃣ Draw the current phase, collecting clicks
        let mut events = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Video Downloader");
            ui.separator();

            if self.session.shows_input() {
                input_form(ui, &mut self.session, &mut events);
            }

            match self.session.phase() {
                Phase::Loading { message } => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(message);
                    });
                }
                Phase::FormatSelection { title, listing } => {
                    ui.small(self.session.video_url());
                    format_list(ui, &FormatsView::build(title, listing), &mut events);
                }
                Phase::Result { file, save } => {
                    result_panel(ui, file, save, &mut self.download_folder, &mut events);
                }
                Phase::Input | Phase::Error { .. } => {}
            }

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                ui.small(format!("Backend: {}", self.gateway.config().base_url));
            });
        });

        // 3️⃣ Act on clicks once drawing no longer borrows the session
        for event in events {
            self.handle(event, ctx);
        }
    }
}

/// URL and output-name fields, with any error above them
fn input_form(ui: &mut egui::Ui, session: &mut Session, events: &mut Vec<UiEvent>) {
    if let Some(message) = session.error_message() {
        ui.colored_label(Color32::LIGHT_RED, message);
        ui.add_space(6.0);
    }

    ui.label("Paste video URL:");
    ui.add(egui::TextEdit::singleline(&mut session.url_input).hint_text("https://..."));

    ui.label("Output name (optional):");
    ui.add(egui::TextEdit::singleline(&mut session.output_name).hint_text("my_video"));

    ui.add_space(8.0);
    if ui.button("Fetch Formats").clicked() {
        events.push(UiEvent::FetchFormats);
    }
}

/// Video title, video rows, and audio rows when there are any
fn format_list(ui: &mut egui::Ui, formats: &FormatsView, events: &mut Vec<UiEvent>) {
    ui.label(RichText::new(&formats.title).strong().size(16.0));
    ui.add_space(6.0);

    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .max_height((ui.available_height() - 60.0).max(120.0))
        .show(ui, |ui| {
            ui.heading("Video");
            for row in &formats.video {
                format_row(ui, row, events);
            }

            if formats.show_audio {
                ui.add_space(8.0);
                ui.heading("Audio");
                for row in &formats.audio {
                    format_row(ui, row, events);
                }
            }
        });

    ui.add_space(8.0);
    if ui.button("↺ Start Over").clicked() {
        events.push(UiEvent::Reset);
    }
}

/// One format with its download button
fn format_row(ui: &mut egui::Ui, row: &FormatRow, events: &mut Vec<UiEvent>) {
    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.label(row.kind.icon());
            ui.label(RichText::new(&row.label).strong());
            ui.label(RichText::new(&row.detail).weak());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let button = egui::Button::new("⬇ Download").fill(Color32::DARK_GREEN);
                if ui.add(button).clicked() {
                    events.push(UiEvent::Download(row.format_id.clone()));
                }
            });
        });
    });
}

/// Link to the produced file plus the local save controls
fn result_panel(
    ui: &mut egui::Ui,
    file: &DownloadedFile,
    save: &SaveStatus,
    download_folder: &mut String,
    events: &mut Vec<UiEvent>,
) {
    ui.label(RichText::new("✅ Download ready").strong());
    ui.hyperlink_to(view::result_caption(&file.filename), &file.link);
    ui.add_space(10.0);

    ui.horizontal(|ui| {
        ui.label("Save to folder:");
        ui.text_edit_singleline(download_folder);
        if ui.button("Browse…").clicked() {
            if let Some(folder) = FileDialog::new().set_directory(&*download_folder).pick_folder() {
                *download_folder = folder.display().to_string();
            }
        }
    });

    ui.horizontal(|ui| {
        let saving = matches!(save, SaveStatus::Saving);
        if ui.add_enabled(!saving, egui::Button::new("💾 Save")).clicked() {
            events.push(UiEvent::Save);
        }
        match save {
            SaveStatus::Idle => {}
            SaveStatus::Saving => {
                ui.spinner();
            }
            SaveStatus::Saved(path) => {
                ui.label(format!("Saved to {}", path.display()));
                if ui.button("Open Folder").clicked() {
                    events.push(UiEvent::OpenFolder);
                }
            }
        }
    });

    ui.add_space(10.0);
    if ui.button("↺ Download Another").clicked() {
        events.push(UiEvent::Reset);
    }
}

/// Open `folder` in the platform file manager
fn open_folder(folder: String) {
    info!(%folder, "opening download folder");
    std::thread::spawn(move || {
        #[cfg(target_os = "windows")]
        {
            let _ = std::process::Command::new("explorer").arg(folder).spawn();
        }
        #[cfg(target_os = "macos")]
        {
            let _ = std::process::Command::new("open").arg(folder).spawn();
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let _ = std::process::Command::new("xdg-open").arg(folder).spawn();
        }
    });
}
