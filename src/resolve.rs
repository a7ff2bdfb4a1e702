//! Flattening host metadata into a [`ContentSnapshot`].
//!
//! Hosts often hold several candidate values for the same SEO field (a
//! native excerpt, one or more SEO plugin fields, theme overrides). A
//! [`ContentDraft`] carries those candidates as ordered lists; resolution
//! picks the first non-blank value for each and produces the flat snapshot
//! the scorer works on. The scorer never sees the candidate lists.

use anyhow::{Context, Result};
use onpage_core::ContentSnapshot;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::Config;

/// A content record as supplied by the host, before override resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDraft {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "bodyMarkup")]
    pub body_markup: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub url: String,
    /// Candidate meta titles in priority order.
    #[serde(default, alias = "metaTitleSources")]
    pub meta_title_sources: Vec<String>,
    /// Candidate meta descriptions in priority order.
    #[serde(default, alias = "metaDescriptionSources")]
    pub meta_description_sources: Vec<String>,
    #[serde(default, alias = "siteBaseUrl")]
    pub site_base_url: Option<String>,
}

/// First value that is not empty after trimming, trimmed.
pub fn first_non_blank(sources: &[String]) -> Option<String> {
    sources
        .iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Resolve override chains and fill the site base URL.
///
/// `default_base_url` applies only when the draft has no base URL of its own.
pub fn resolve_snapshot(draft: ContentDraft, default_base_url: Option<&str>) -> ContentSnapshot {
    let site_base_url = draft
        .site_base_url
        .filter(|b| !b.trim().is_empty())
        .or_else(|| default_base_url.map(str::to_string))
        .unwrap_or_default();

    ContentSnapshot {
        id: draft.id,
        title: draft.title,
        body_markup: draft.body_markup,
        excerpt: draft.excerpt,
        url: draft.url,
        existing_meta_title: first_non_blank(&draft.meta_title_sources),
        existing_meta_description: first_non_blank(&draft.meta_description_sources),
        site_base_url,
    }
}

/// Read a JSON [`ContentDraft`] from disk.
pub fn load_draft(path: &Path) -> Result<ContentDraft> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read content file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse content file: {}", path.display()))
}

/// Load and resolve a content file using the configured site base URL.
pub fn load_snapshot(path: &Path, config: &Config) -> Result<ContentSnapshot> {
    let draft = load_draft(path)?;
    Ok(resolve_snapshot(draft, config.site.base_url.as_deref()))
}
