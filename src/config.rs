//! Backend and local folder configuration.

/// Address of the local backend service.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
/// Where saved files land unless the user picks another folder.
pub const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";

#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base address, without a trailing slash
    pub base_url: String,
    /// Destination folder for saved files
    pub download_folder: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            download_folder: DEFAULT_DOWNLOAD_DIR.to_string(),
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base(&base_url.into()),
            ..Self::default()
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let base_url = std::env::var("FORMAT_PICKER_BACKEND_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        Self {
            download_folder: std::env::var("FORMAT_PICKER_DOWNLOAD_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DOWNLOAD_DIR.to_string()),
            ..Self::new(base_url)
        }
    }

    pub fn formats_endpoint(&self) -> String {
        format!("{}/api/formats", self.base_url)
    }

    pub fn download_endpoint(&self) -> String {
        format!("{}/api/download", self.base_url)
    }
}

fn normalize_base(input: &str) -> String {
    input.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend() {
        let cfg = BackendConfig::default();
        assert_eq!(cfg.formats_endpoint(), "http://127.0.0.1:5000/api/formats");
        assert_eq!(cfg.download_endpoint(), "http://127.0.0.1:5000/api/download");
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let cfg = BackendConfig::new("http://localhost:8080/ ");
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(cfg.download_folder, DEFAULT_DOWNLOAD_DIR);
    }
}
