//! Plain row descriptors for the format list; egui only draws these.

use crate::normalizer::{FormatListing, LabeledFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Video,
    Audio,
}

impl RowKind {
    pub fn icon(self) -> &'static str {
        match self {
            RowKind::Video => "🖥",
            RowKind::Audio => "🔊",
        }
    }
}

/// One selectable line; its button triggers a download of `format_id`
#[derive(Debug, Clone, PartialEq)]
pub struct FormatRow {
    pub kind: RowKind,
    pub format_id: String,
    pub label: String,
    /// e.g. "(MP4 - 50 MB)"
    pub detail: String,
}

impl FormatRow {
    fn new(kind: RowKind, entry: &LabeledFormat) -> Self {
        let label = match kind {
            RowKind::Video => entry.label.to_string(),
            RowKind::Audio => "Audio Only".to_string(),
        };
        Self {
            kind,
            format_id: entry.format.format_id.clone(),
            label,
            detail: format!(
                "({} - {} MB)",
                entry.format.ext.to_uppercase(),
                entry.format.filesize_mb
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormatsView {
    pub title: String,
    pub video: Vec<FormatRow>,
    pub audio: Vec<FormatRow>,
    pub show_audio: bool,
}

impl FormatsView {
    pub fn build(title: &str, listing: &FormatListing) -> Self {
        Self {
            title: title.to_string(),
            video: listing
                .video
                .iter()
                .map(|e| FormatRow::new(RowKind::Video, e))
                .collect(),
            audio: listing
                .audio
                .iter()
                .map(|e| FormatRow::new(RowKind::Audio, e))
                .collect(),
            show_audio: listing.show_audio_section(),
        }
    }
}

/// Caption of the final link
pub fn result_caption(filename: &str) -> String {
    format!("Download {filename}")
}
