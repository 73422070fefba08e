use crate::error::ContentError;
use async_trait::async_trait;
use reqwest::Client;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

/// Where content documents come from.
///
/// Paths are rooted content paths such as `/content/index.yaml`.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_text(&self, path: &str) -> Result<String, ContentError>;
}

/// Fetches documents over HTTP relative to a base URL.
pub struct HttpContentSource {
    http: Client,
    base: Url,
}

impl HttpContentSource {
    pub fn new(base: Url) -> Self {
        Self::with_client(Client::new(), base)
    }

    pub fn with_client(http: Client, base: Url) -> Self {
        Self { http, base }
    }

    /// Append each path segment to the base URL, percent-encoding as needed.
    pub fn url_for(&self, path: &str) -> Result<Url, ContentError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ContentError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase)
            })?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch_text(&self, path: &str) -> Result<String, ContentError> {
        let url = self.url_for(path)?;
        debug!(%url, "Fetching content");

        let transport = |source| ContentError::Transport {
            url: url.to_string(),
            source,
        };
        let response = self.http.get(url.clone()).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(transport)
    }
}

/// Reads documents from a local directory that contains `content/`.
#[derive(Debug, Clone)]
pub struct FsContentSource {
    root: PathBuf,
}

impl FsContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn file_for(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|segment| !segment.is_empty() && *segment != "..")
            .fold(self.root.clone(), |file, segment| file.join(segment))
    }
}

#[async_trait]
impl ContentSource for FsContentSource {
    async fn fetch_text(&self, path: &str) -> Result<String, ContentError> {
        let file = self.file_for(path);
        debug!(file = %file.display(), "Reading content");

        match tokio::fs::read_to_string(&file).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(ContentError::NotFound {
                path: path.to_string(),
            }),
            Err(source) => Err(ContentError::Io { path: file, source }),
        }
    }
}
