//! Error types shared by the gateway and the session controller.

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Please enter a valid URL starting with http.")]
    Validation,

    /// The backend could not be reached at all.
    #[error("Connection failed. Ensure the backend server is running at {base_url}.")]
    Transport {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx answer; carries the server message or the status text.
    #[error("{0}")]
    Api(String),

    #[error("No usable video formats were found for this URL.")]
    EmptyResult,

    #[error("Unexpected response from server: {0}")]
    InvalidResponse(#[source] reqwest::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// The user action an error is reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Formats,
    Download,
    Save,
}

impl Step {
    fn prefix(self) -> &'static str {
        match self {
            Step::Formats => "Error fetching formats",
            Step::Download => "Download failed",
            Step::Save => "Saving failed",
        }
    }
}

impl AppError {
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Single line shown to the user after `step` failed.
    pub fn user_message(&self, step: Step) -> String {
        match self {
            AppError::Validation | AppError::Transport { .. } => self.to_string(),
            _ => {
                let detail = self.to_string();
                let detail = detail.trim_end_matches('.');
                format!("{}: {}.", step.prefix(), detail)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_message_is_wrapped_per_step() {
        let err = AppError::api("Video unavailable");
        assert_eq!(
            err.user_message(Step::Formats),
            "Error fetching formats: Video unavailable."
        );
        assert_eq!(err.user_message(Step::Download), "Download failed: Video unavailable.");
    }

    #[test]
    fn empty_result_keeps_a_single_period() {
        assert_eq!(
            AppError::EmptyResult.user_message(Step::Formats),
            "Error fetching formats: No usable video formats were found for this URL."
        );
    }

    #[test]
    fn validation_is_shown_verbatim() {
        assert_eq!(
            AppError::Validation.user_message(Step::Formats),
            "Please enter a valid URL starting with http."
        );
    }

    #[test]
    fn io_errors_convert() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.user_message(Step::Save), "Saving failed: denied.");
        assert!(!matches!(err, AppError::Transport { .. }));
    }
}
