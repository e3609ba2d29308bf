use std::path::{Path, PathBuf};

use gray_matter::{engine::YAML, Matter};
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::{error, info};

use crate::error::TemplateError;
use crate::markdown::render_markdown_to_html;
use crate::models::{HomeFrontMatter, ResumeFrontMatter};
use crate::state::AppState;

/// Everything the site renders that lives on local disk rather than on the
/// remote content host.
#[derive(Debug, Clone, Default)]
pub struct SiteTemplates {
    pub layout_html: String,
    pub banner_html: String,
    pub not_found_html: String, // supports {{ filename }} placeholder
    pub home: HomeFrontMatter,
    pub home_html: String,
    pub resume: ResumeFrontMatter,
    pub resume_html: String,
}

async fn read(path: PathBuf) -> Result<String, TemplateError> {
    fs::read_to_string(&path)
        .await
        .map_err(|source| TemplateError::Io { path, source })
}

/// Splits a Markdown file into its front matter and rendered body. A file
/// without front matter gets `T::default()`.
async fn read_markdown<T>(path: PathBuf) -> Result<(T, String), TemplateError>
where
    T: DeserializeOwned + Default,
{
    let raw = read(path.clone()).await?;
    let matter = Matter::<YAML>::new();
    let parsed = matter
        .parse::<T>(&raw)
        .map_err(|e| TemplateError::FrontMatter {
            path,
            message: e.to_string(),
        })?;
    let front_matter = parsed.data.unwrap_or_default();
    Ok((front_matter, render_markdown_to_html(&parsed.content)))
}

pub async fn load_templates(content_dir: &Path) -> Result<SiteTemplates, TemplateError> {
    let layout_html = read(content_dir.join("layout.html")).await?;
    let banner_html = read(content_dir.join("banner.html")).await?;
    let not_found_html = read(content_dir.join("not_found.html")).await?;
    let (home, home_html) =
        read_markdown::<HomeFrontMatter>(content_dir.join("home.md")).await?;
    let (resume, resume_html) =
        read_markdown::<ResumeFrontMatter>(content_dir.join("resume.md")).await?;

    Ok(SiteTemplates {
        layout_html,
        banner_html,
        not_found_html,
        home,
        home_html,
        resume,
        resume_html,
    })
}

pub async fn reload_templates(app_state: &AppState) {
    info!("Reloading site templates...");
    match load_templates(&app_state.config.content_dir).await {
        Ok(templates) => {
            *app_state.templates.write().await = templates;
            info!("Templates successfully reloaded.");
        }
        Err(e) => {
            error!("Failed to reload templates: {}", e);
        }
    }
}
