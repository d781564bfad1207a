//! HTTP calls to the backend: format listing, download requests and
//! fetching the produced file. Failures come back as typed `AppError`s.

use std::path::{Path, PathBuf};

use reqwest::{Client, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    config::BackendConfig,
    error::{AppError, AppResult},
    model::{
        DownloadRequest, DownloadResponse, DownloadedFile, ErrorBody, FormatsRequest,
        FormatsResponse, VideoFormats,
    },
};

/// Typed access to the backend's two JSON endpoints and its file route.
#[derive(Debug, Clone)]
pub struct Gateway {
    client: Client,
    config: BackendConfig,
}

impl Gateway {
    /// Gateway with a fresh connection pool for the configured backend
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Backend address and folder settings in use
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// `POST /api/formats`
    pub async fn fetch_formats(&self, url: &str) -> AppResult<VideoFormats> {
        let response: FormatsResponse = self
            .post_json(self.config.formats_endpoint(), &FormatsRequest { url })
            .await?;

        match response.formats {
            Some(formats) if !formats.is_empty() => Ok(VideoFormats {
                title: response.title,
                formats,
            }),
            _ => Err(AppError::EmptyResult),
        }
    }

    /// `POST /api/download`
    pub async fn start_download(&self, request: &DownloadRequest) -> AppResult<DownloadResponse> {
        self.post_json(self.config.download_endpoint(), request).await
    }

    /// Address the backend serves a produced file from.
    pub fn download_link(&self, filename: &str) -> String {
        download_link(&self.config.base_url, filename)
    }

    /// Fetch a produced file and write it into `folder`. Returns the written path.
    pub async fn save_file(&self, file: &DownloadedFile, folder: &Path) -> AppResult<PathBuf> {
        // Only the final component, so a hostile name cannot escape `folder`.
        let name = Path::new(&file.filename)
            .file_name()
            .ok_or_else(|| AppError::api(format!("Invalid filename {:?}", file.filename)))?;

        debug!(link = %file.link, "fetching produced file");
        let response = self
            .client
            .get(&file.link)
            .send()
            .await
            .map_err(|source| self.transport(source))?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, link = %file.link, "file fetch rejected");
            return Err(AppError::Api(status_text(status)));
        }
        let bytes = response.bytes().await.map_err(AppError::InvalidResponse)?;

        tokio::fs::create_dir_all(folder).await?;
        let path = folder.join(name);
        tokio::fs::write(&path, &bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "file saved");
        Ok(path)
    }

    /// POST `body` as JSON and decode a 2xx reply into `R`.
    async fn post_json<B, R>(&self, endpoint: String, body: &B) -> AppResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(%endpoint, "sending request");
        let response = self
            .client
            .post(&endpoint)
            .json(body)
            .send()
            .await
            .map_err(|source| self.transport(source))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            warn!(%endpoint, %status, %message, "backend returned an error");
            return Err(AppError::Api(message));
        }

        response.json::<R>().await.map_err(|err| {
            warn!(%endpoint, error = %err, "unreadable response body");
            AppError::InvalidResponse(err)
        })
    }

    fn transport(&self, source: reqwest::Error) -> AppError {
        warn!(base_url = %self.config.base_url, error = %source, "backend unreachable");
        AppError::Transport {
            base_url: self.config.base_url.clone(),
            source,
        }
    }
}

/// `<base>/downloads/<percent-encoded filename>`
pub fn download_link(base_url: &str, filename: &str) -> String {
    format!("{}/downloads/{}", base_url, urlencoding::encode(filename))
}

/// Server-supplied `error`, else the status text.
async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(ErrorBody { error: Some(msg) }) if !msg.trim().is_empty() => msg,
        _ => status_text(status),
    }
}

fn status_text(status: StatusCode) -> String {
    format!(
        "Server error: {}",
        status.canonical_reason().unwrap_or(status.as_str())
    )
}
