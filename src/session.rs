//! View state controller: which phase the window is in and the URL it is
//! working on. Every transition goes through a method here.

use std::path::PathBuf;

use tracing::{debug, error};

use crate::{
    error::{AppError, AppResult, Step},
    model::{DownloadRequest, DownloadedFile, VideoFormats},
    normalizer::{FormatListing, normalize},
};

/// Progress line while formats are being resolved
pub const FETCHING_MESSAGE: &str = "Contacting server to fetch format data...";

/// Progress of the optional local copy in the result phase
#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved(PathBuf),
}

/// Mutually exclusive UI states
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Input,
    Loading { message: String },
    FormatSelection { title: String, listing: FormatListing },
    Result { file: DownloadedFile, save: SaveStatus },
    /// Shown on top of the input form
    Error { message: String },
}

impl Phase {
    /// Short name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Input => "input",
            Phase::Loading { .. } => "loading",
            Phase::FormatSelection { .. } => "format-selection",
            Phase::Result { .. } => "result",
            Phase::Error { .. } => "error",
        }
    }
}

/// True iff `url` is non-empty and starts with `http`.
pub fn validate(url: &str) -> bool {
    !url.is_empty() && url.starts_with("http")
}

/// The one piece of UI state, owned by the app and mutated only on the UI thread
#[derive(Debug, Clone)]
pub struct Session {
    /// Text of the URL field
    pub url_input: String,
    /// Text of the optional output name field
    pub output_name: String,
    /// Set only by a successful `submit_url`
    video_url: String,
    phase: Phase,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            url_input: String::new(),
            output_name: String::new(),
            video_url: String::new(),
            phase: Phase::Input,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently visible phase
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Last URL that passed validation; empty after a reset.
    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    /// Input form is visible in these phases.
    pub fn shows_input(&self) -> bool {
        matches!(self.phase, Phase::Input | Phase::Error { .. })
    }

    /// Text shown over the input form, if any
    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Back to an empty input form; inputs, URL and listings are cleared.
    pub fn reset(&mut self) {
        debug!(from = self.phase.name(), "session reset");
        *self = Self::default();
    }

    /// Put `message` above the input form, verbatim.
    pub fn show_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!(from = self.phase.name(), %message, "showing error");
        self.phase = Phase::Error { message };
    }

    /// Validate the URL field. Returns the URL to fetch formats for, or
    /// `None` after putting the validation error on screen.
    pub fn submit_url(&mut self) -> Option<String> {
        let url = self.url_input.trim();
        if !validate(url) {
            self.show_error(AppError::Validation.user_message(Step::Formats));
            return None;
        }
        self.video_url = url.to_string();
        self.transition(Phase::Loading {
            message: FETCHING_MESSAGE.to_string(),
        });
        Some(self.video_url.clone())
    }

    /// Apply the formats reply: normalized listing on success, error otherwise.
    /// Ignored unless a fetch is pending.
    pub fn formats_loaded(&mut self, result: AppResult<VideoFormats>) {
        if !matches!(self.phase, Phase::Loading { .. }) {
            debug!(phase = self.phase.name(), "ignoring stale formats reply");
            return;
        }
        match result {
            Ok(VideoFormats { title, formats }) => {
                let listing = normalize(formats);
                debug!(
                    total = listing.len(),
                    audio = listing.audio.len(),
                    "formats normalized"
                );
                self.transition(Phase::FormatSelection { title, listing });
            }
            Err(err) => self.show_error(err.user_message(Step::Formats)),
        }
    }

    /// Start downloading one of the listed formats.
    pub fn begin_download(&mut self, format_id: &str) -> Option<DownloadRequest> {
        let Phase::FormatSelection { listing, .. } = &self.phase else {
            return None;
        };
        if listing.find(format_id).is_none() || !validate(&self.video_url) {
            return None;
        }
        let request = DownloadRequest {
            url: self.video_url.clone(),
            format_id: format_id.to_string(),
            output_name: self.output_name.trim().to_string(),
        };
        self.transition(Phase::Loading {
            message: format!(
                "Starting download of format ID: {format_id}... This may take a moment."
            ),
        });
        Some(request)
    }

    /// Apply the download reply: result page on success, error otherwise.
    /// Ignored unless a download is pending.
    pub fn download_finished(&mut self, result: AppResult<DownloadedFile>) {
        if !matches!(self.phase, Phase::Loading { .. }) {
            debug!(phase = self.phase.name(), "ignoring stale download reply");
            return;
        }
        match result {
            Ok(file) => self.transition(Phase::Result {
                file,
                save: SaveStatus::Idle,
            }),
            Err(err) => self.show_error(err.user_message(Step::Download)),
        }
    }

    /// File to copy locally, if the result phase is idle.
    pub fn begin_save(&mut self) -> Option<DownloadedFile> {
        match &mut self.phase {
            Phase::Result { file, save } if !matches!(save, SaveStatus::Saving) => {
                *save = SaveStatus::Saving;
                Some(file.clone())
            }
            _ => None,
        }
    }

    /// Apply the outcome of saving `saved`. Dropped unless that same file
    /// is still on screen with its save pending, so a reply from before a
    /// reset cannot land on a later result.
    pub fn save_finished(&mut self, saved: &DownloadedFile, result: AppResult<PathBuf>) {
        let Phase::Result { file, save } = &mut self.phase else {
            debug!(filename = %saved.filename, "ignoring stale save reply");
            return;
        };
        if *file != *saved || !matches!(save, SaveStatus::Saving) {
            debug!(filename = %saved.filename, "ignoring save reply for another result");
            return;
        }
        match result {
            Ok(path) => *save = SaveStatus::Saved(path),
            Err(err) => self.show_error(err.user_message(Step::Save)),
        }
    }

    fn transition(&mut self, next: Phase) {
        debug!(from = self.phase.name(), to = next.name(), "phase change");
        self.phase = next;
    }
}
