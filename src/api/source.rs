//! Where the posts document comes from.
//!
//! The document is a single JSON array fetched once at startup. It may live
//! behind HTTP (absolute URL, or a relative name joined onto `base_url`) or in
//! a local file. Both sources hand back the undecoded JSON; validating it as
//! post records is the store's job.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Url;
use serde_json::Value;

use super::FetchError;
use crate::core::config::ResolvedConfig;

#[async_trait]
pub trait PostSource: Send + Sync {
    /// Human-readable location, shown in the footer and the log.
    fn describe(&self) -> String;

    /// Retrieve the raw posts document.
    async fn fetch(&self) -> Result<Value, FetchError>;
}

/// Posts served over HTTP(S).
pub struct HttpSource {
    url: Url,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: Url, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl PostSource for HttpSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<Value, FetchError> {
        info!("Fetching posts from {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        debug!("Received {} bytes from {}", body.len(), self.url);
        Ok(serde_json::from_str(&body)?)
    }
}

/// Posts read from a file on disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PostSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Value, FetchError> {
        info!("Reading posts from {}", self.path.display());
        let body = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Pick a source for the configured location.
///
/// - `source` is an absolute `http(s)://` URL → HTTP.
/// - `base_url` is set → `source` is joined onto it (a `file://` base yields a file).
/// - otherwise `source` is a filesystem path.
pub fn build_source(config: &ResolvedConfig) -> Result<Box<dyn PostSource>, FetchError> {
    let timeout = config.fetch_timeout;

    if let Ok(url) = Url::parse(&config.source)
        && matches!(url.scheme(), "http" | "https")
    {
        return Ok(Box::new(HttpSource::new(url, timeout)?));
    }

    let Some(base) = config.base_url.as_deref() else {
        return Ok(Box::new(FileSource::new(&config.source)));
    };

    let base = Url::parse(base).map_err(|e| FetchError::Location(format!("{base}: {e}")))?;
    let url = base
        .join(&config.source)
        .map_err(|e| FetchError::Location(format!("{}: {e}", config.source)))?;

    match url.scheme() {
        "http" | "https" => Ok(Box::new(HttpSource::new(url, timeout)?)),
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| FetchError::Location(url.to_string()))?;
            Ok(Box::new(FileSource::new(path)))
        }
        other => Err(FetchError::Location(format!("unsupported scheme '{other}'"))),
    }
}
