//! Turns the backend's raw format list into labelled, deduplicated
//! video and audio lists, largest first.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Format;

static HEIGHT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)p").expect("height pattern compiles"));

/// Human label a format is bucketed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityLabel {
    Audio,
    Uhd8k,
    Uhd4k,
    Qhd1440,
    Fhd1080,
    Hd720,
    Sd480,
    P360,
    P240,
    P144,
    /// Anything under 100 lines keeps its raw height
    Other(u32),
}

impl QualityLabel {
    /// Thresholds are checked top-down, first match wins.
    pub fn from_height(height: u32) -> Self {
        match height {
            h if h >= 4000 => Self::Uhd8k,
            h if h >= 2000 => Self::Uhd4k,
            h if h >= 1400 => Self::Qhd1440,
            h if h >= 950 => Self::Fhd1080,
            h if h >= 650 => Self::Hd720,
            h if h >= 450 => Self::Sd480,
            h if h >= 300 => Self::P360,
            h if h >= 200 => Self::P240,
            h if h >= 100 => Self::P144,
            h => Self::Other(h),
        }
    }

    /// Classify a backend quality string such as "1080p" or "Audio Only".
    pub fn classify(quality: &str) -> Self {
        if quality.contains("Audio") {
            return Self::Audio;
        }
        Self::from_height(extract_height(quality))
    }

    pub fn is_audio(self) -> bool {
        matches!(self, Self::Audio)
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Audio => "Audio Only (MP4/M4A)",
            Self::Uhd8k => "8K (4320p)",
            Self::Uhd4k => "4K (2160p)",
            Self::Qhd1440 => "1440p (QHD)",
            Self::Fhd1080 => "1080p (FHD)",
            Self::Hd720 => "720p (HD)",
            Self::Sd480 => "480p (SD)",
            Self::P360 => "360p",
            Self::P240 => "240p",
            Self::P144 => "144p",
            Self::Other(h) => return write!(f, "{h}p"),
        };
        f.write_str(text)
    }
}

/// Height from the first `<digits>p` in the label, 0 when there is none.
pub fn extract_height(quality: &str) -> u32 {
    HEIGHT_RE
        .captures(quality)
        .and_then(|caps| caps.get(1))
        // Only overflow can fail here; such a label is huge, not missing.
        .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX))
        .unwrap_or(0)
}

/// A backend format with its derived display label
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledFormat {
    pub label: QualityLabel,
    pub format: Format,
}

/// Output of one normalization pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatListing {
    pub video: Vec<LabeledFormat>,
    pub audio: Vec<LabeledFormat>,
}

impl FormatListing {
    pub fn show_audio_section(&self) -> bool {
        !self.audio.is_empty()
    }

    pub fn len(&self) -> usize {
        self.video.len() + self.audio.len()
    }

    pub fn find(&self, format_id: &str) -> Option<&LabeledFormat> {
        self.video
            .iter()
            .chain(self.audio.iter())
            .find(|lf| lf.format.format_id == format_id)
    }
}

/// Sort by size descending, label, drop (label, size, ext) duplicates and
/// split into video and audio.
pub fn normalize(mut formats: Vec<Format>) -> FormatListing {
    formats.sort_by(|a, b| b.filesize_mb.total_cmp(&a.filesize_mb));

    let mut seen: HashSet<(QualityLabel, u64, String)> = HashSet::new();
    let mut listing = FormatListing::default();

    for format in formats {
        let label = QualityLabel::classify(&format.quality);
        let key = (label, format.filesize_mb.to_bits(), format.ext.clone());
        if !seen.insert(key) {
            continue;
        }
        let entry = LabeledFormat { label, format };
        if label.is_audio() {
            listing.audio.push(entry);
        } else {
            listing.video.push(entry);
        }
    }

    listing
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ordering of video buckets, 0 for the raw-height fallback.
    fn rank(label: QualityLabel) -> u8 {
        match label {
            QualityLabel::Other(_) => 0,
            QualityLabel::P144 => 1,
            QualityLabel::P240 => 2,
            QualityLabel::P360 => 3,
            QualityLabel::Sd480 => 4,
            QualityLabel::Hd720 => 5,
            QualityLabel::Fhd1080 => 6,
            QualityLabel::Qhd1440 => 7,
            QualityLabel::Uhd4k => 8,
            QualityLabel::Uhd8k => 9,
            QualityLabel::Audio => 10,
        }
    }

    /// Underlying formats, video first.
    fn formats(listing: &FormatListing) -> Vec<Format> {
        listing
            .video
            .iter()
            .chain(listing.audio.iter())
            .map(|lf| lf.format.clone())
            .collect()
    }

    fn fmt(id: &str, quality: &str, ext: &str, size: f64) -> Format {
        Format {
            format_id: id.to_string(),
            quality: quality.to_string(),
            ext: ext.to_string(),
            filesize_mb: size,
        }
    }

    #[test]
    fn buckets_match_the_threshold_table() {
        let cases = [
            (4320, "8K (4320p)"),
            (4000, "8K (4320p)"),
            (3999, "4K (2160p)"),
            (2000, "4K (2160p)"),
            (1440, "1440p (QHD)"),
            (1400, "1440p (QHD)"),
            (1080, "1080p (FHD)"),
            (950, "1080p (FHD)"),
            (720, "720p (HD)"),
            (650, "720p (HD)"),
            (480, "480p (SD)"),
            (450, "480p (SD)"),
            (360, "360p"),
            (300, "360p"),
            (240, "240p"),
            (200, "240p"),
            (144, "144p"),
            (100, "144p"),
            (99, "99p"),
            (0, "0p"),
        ];
        for (height, label) in cases {
            assert_eq!(QualityLabel::from_height(height).to_string(), label, "height {height}");
        }
    }

    #[test]
    fn label_mapping_is_monotonic() {
        let mut prev = rank(QualityLabel::from_height(0));
        for h in 1..=5000 {
            let current = rank(QualityLabel::from_height(h));
            assert!(current >= prev, "rank dropped at height {h}");
            prev = current;
        }
        assert_eq!(QualityLabel::from_height(u32::MAX), QualityLabel::Uhd8k);
    }

    #[test]
    fn raw_height_fallback_only_below_100() {
        for h in 0..100 {
            assert_eq!(QualityLabel::from_height(h), QualityLabel::Other(h));
        }
        assert!(!matches!(QualityLabel::from_height(100), QualityLabel::Other(_)));
    }

    #[test]
    fn classify_reads_audio_and_heights() {
        assert_eq!(QualityLabel::classify("Audio Only"), QualityLabel::Audio);
        assert_eq!(QualityLabel::classify("1080p"), QualityLabel::Fhd1080);
        assert_eq!(QualityLabel::classify("1920x1088p60"), QualityLabel::Fhd1080);
        assert_eq!(QualityLabel::classify("unknown"), QualityLabel::Other(0));
        assert_eq!(extract_height("no digits here"), 0);
        assert_eq!(extract_height("99999999999p"), u32::MAX);
    }

    #[test]
    fn duplicate_1080p_keeps_first() {
        let listing = normalize(vec![
            fmt("a", "1080p", "mp4", 50.0),
            fmt("b", "1080p", "mp4", 50.0),
        ]);
        assert_eq!(listing.video.len(), 1);
        assert!(listing.audio.is_empty());
        assert_eq!(listing.video[0].label.to_string(), "1080p (FHD)");
        assert_eq!(listing.video[0].format.format_id, "a");
    }

    #[test]
    fn different_ext_or_size_are_not_duplicates() {
        let listing = normalize(vec![
            fmt("a", "720p", "mp4", 20.0),
            fmt("b", "720p", "webm", 20.0),
            fmt("c", "720p", "mp4", 21.0),
            fmt("d", "700p", "mp4", 20.0),
        ]);
        let ids: Vec<_> = listing.video.iter().map(|lf| lf.format.format_id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn sorted_descending_and_split() {
        let listing = normalize(vec![
            fmt("s", "360p", "mp4", 5.0),
            fmt("aud", "Audio Only", "m4a", 3.5),
            fmt("l", "2160p", "webm", 400.0),
            fmt("m", "1080p", "mp4", 80.0),
        ]);
        let ids: Vec<_> = listing.video.iter().map(|lf| lf.format.format_id.as_str()).collect();
        assert_eq!(ids, ["l", "m", "s"]);
        assert_eq!(listing.audio.len(), 1);
        assert_eq!(listing.audio[0].label, QualityLabel::Audio);
        assert!(listing.show_audio_section());
        assert_eq!(listing.len(), 4);
    }

    #[test]
    fn audio_section_hidden_without_audio() {
        let listing = normalize(vec![fmt("v", "480p", "mp4", 10.0)]);
        assert!(!listing.show_audio_section());
        assert_eq!(normalize(Vec::new()).len(), 0);
    }

    #[test]
    fn normalizing_twice_is_idempotent() {
        let input = vec![
            fmt("1", "1080p", "mp4", 50.0),
            fmt("2", "1080p", "mp4", 50.0),
            fmt("3", "Audio Only", "m4a", 50.0),
            fmt("4", "1000p", "mp4", 50.0),
            fmt("5", "720p", "webm", 12.5),
            fmt("6", "Audio Only", "webm", 3.0),
            fmt("7", "Audio Only", "webm", 3.0),
            fmt("8", "64p", "3gp", 0.5),
        ];
        let once = normalize(input);
        let twice = normalize(formats(&once));
        assert_eq!(once, twice);
        assert_eq!(once.len(), 5);
    }

    #[test]
    fn find_looks_in_both_sections() {
        let listing = normalize(vec![
            fmt("v", "480p", "mp4", 10.0),
            fmt("a", "Audio Only", "m4a", 2.0),
        ]);
        assert_eq!(listing.find("a").map(|lf| lf.label), Some(QualityLabel::Audio));
        assert!(listing.find("zzz").is_none());
    }
}
