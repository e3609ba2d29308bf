use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_CONFIG_PATH: &str = "blog.toml";
const DEFAULT_PORT: u16 = 8080;

/// Where the post index and bodies live. URLs are built as
/// `<base_url>/<owner>/<repo>/<branch>/<path>/<file>`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub path: String,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://raw.githubusercontent.com".to_string(),
            owner: String::new(),
            repo: String::new(),
            branch: "refs/heads/main".to_string(),
            path: "src/assets/blogs".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ListingConfig {
    pub page_size: usize,
    pub preview_chars: usize,
    pub preview_lines: usize,
    pub words_per_minute: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: 5,
            preview_chars: 200,
            preview_lines: 3,
            words_per_minute: 200,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub content_dir: PathBuf,
    pub source: SourceConfig,
    pub listing: ListingConfig,
    #[serde(skip)]
    pub is_development: bool,
    #[serde(skip)]
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            source: SourceConfig::default(),
            listing: ListingConfig::default(),
            is_development: false,
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Reads `BLOG_CONFIG` (or `blog.toml`) and applies the `RUST_ENV` and
    /// `PORT` overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var("BLOG_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.is_development = std::env::var("RUST_ENV")
            .map(|v| v == "development")
            .unwrap_or(false);
        config.port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listing.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::parse(
            r#"
            [source]
            owner = "someone"
            repo = "portfolio"

            [listing]
            page_size = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.source.owner, "someone");
        assert_eq!(config.source.branch, "refs/heads/main");
        assert_eq!(config.source.base_url, "https://raw.githubusercontent.com");
        assert_eq!(config.listing.page_size, 2);
        assert_eq!(config.listing.preview_chars, 200);
        assert_eq!(config.listing.words_per_minute, 200);
        assert_eq!(config.content_dir, PathBuf::from("content"));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let config = Config::parse("[listing]\npage_size = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ZeroPageSize)));
    }

    #[test]
    fn unknown_types_fail_to_parse() {
        assert!(Config::parse("[listing]\npage_size = \"five\"\n").is_err());
    }
}
