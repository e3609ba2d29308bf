use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::config::SourceConfig;
use crate::error::{ConfigError, FetchError};
use crate::models::Post;

const INDEX_FILE: &str = "posts.json";

/// Client for the remote blob store holding `posts.json` and the Markdown
/// bodies it points at.
#[derive(Clone, Debug)]
pub struct ContentHost {
    client: reqwest::Client,
    root: Url,
}

impl ContentHost {
    pub fn new(config: &SourceConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            root: content_root(config)?,
        })
    }

    pub fn index_url(&self) -> Url {
        self.file_url(INDEX_FILE)
    }

    pub fn file_url(&self, filename: &str) -> Url {
        let mut url = self.root.clone();
        // `root` was checked to be a base url in `content_root`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(filename);
        }
        url
    }

    pub async fn fetch_index(&self) -> Result<Vec<Post>, FetchError> {
        let url = self.index_url();
        debug!(%url, "fetching post index");
        self.get(url.clone())
            .await
            .map_err(|source| FetchError::IndexFetchFailed { url, source })
    }

    pub async fn fetch_content(&self, filename: &str) -> Result<String, FetchError> {
        let url = self.file_url(filename);
        debug!(%url, "fetching post content");
        self.get_text(url)
            .await
            .map_err(|source| FetchError::ContentFetchFailed {
                filename: filename.to_string(),
                source,
            })
    }

    async fn get(&self, url: Url) -> reqwest::Result<Vec<Post>> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    async fn get_text(&self, url: Url) -> reqwest::Result<String> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

fn content_root(config: &SourceConfig) -> Result<Url, ConfigError> {
    let mut root = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::BaseUrl(config.base_url.clone(), e))?;
    let base = root.clone();
    {
        let mut segments = root
            .path_segments_mut()
            .map_err(|_| ConfigError::OpaqueBaseUrl(base))?;
        segments.pop_if_empty();
        let parts = [&config.owner, &config.repo, &config.branch, &config.path];
        for part in parts {
            segments.extend(part.split('/').filter(|s| !s.is_empty()));
        }
    }
    Ok(root)
}
