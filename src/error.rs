use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Failures talking to the remote content host. Both variants are absorbed
/// by the post controller; they never reach a rendered page.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to load post index from {url}: {source}")]
    IndexFetchFailed {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to load content for {filename}: {source}")]
    ContentFetchFailed {
        filename: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid content base url {0:?}: {1}")]
    BaseUrl(String, #[source] url::ParseError),
    #[error("content base url {0} cannot carry path segments")]
    OpaqueBaseUrl(Url),
    #[error("listing.page_size must be at least 1")]
    ZeroPageSize,
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Problems reading the local site shell from the content directory.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("bad front matter in {path}: {message}")]
    FrontMatter { path: PathBuf, message: String },
}
