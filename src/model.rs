use serde::{Deserialize, Serialize};

/// One downloadable format as offered by the backend
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Format {
    /// Backend identifier passed back when requesting the download
    pub format_id: String,
    /// Quality label, e.g. "1080p" or "Audio Only"
    pub quality: String,
    /// Container extension (mp4, webm, m4a...)
    pub ext: String,
    /// Approximate size in megabytes
    pub filesize_mb: f64,
}

/// Body of a successful `POST /api/formats`
#[derive(Debug, Clone, Deserialize)]
pub struct FormatsResponse {
    /// Title of the source video
    #[serde(default)]
    pub title: String,
    /// Missing and empty lists are both treated as "nothing usable"
    #[serde(default)]
    pub formats: Option<Vec<Format>>,
}

/// Body sent to `POST /api/formats`
#[derive(Debug, Serialize)]
pub struct FormatsRequest<'a> {
    pub url: &'a str,
}

/// Body sent to `POST /api/download`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    pub format_id: String,
    /// Trimmed user input; may be empty
    pub output_name: String,
}

/// Body of a successful `POST /api/download`
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadResponse {
    pub filename: String,
}

/// Body of any non-2xx backend response
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// A produced file and the address it is served from
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedFile {
    pub filename: String,
    pub link: String,
}

/// Title and formats of a successfully resolved URL
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFormats {
    pub title: String,
    pub formats: Vec<Format>,
}
