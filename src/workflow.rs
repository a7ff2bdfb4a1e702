//! Caller-side workflows over a [`ContentStore`].
//!
//! The core never touches the store. These helpers do what a host does
//! around it: fetch a snapshot, score it and persist the latest result, ask
//! for suggestions, and write accepted suggestions back.

use anyhow::{anyhow, Result};
use onpage_core::generation::{generate_rewrite_suggestions, suggest_keywords};
use onpage_core::store::{AppliedField, ContentStore};
use onpage_core::{
    score, AnalysisResult, ContentSnapshot, KeywordCandidate, KeywordTemplates,
    RewriteSuggestions, TextGenerator,
};
use tracing::info;

async fn require_snapshot(store: &dyn ContentStore, id: &str) -> Result<ContentSnapshot> {
    store
        .get_snapshot(id)
        .await?
        .ok_or_else(|| anyhow!("content not found: {}", id))
}

/// Score content `id` against `keyword` and persist the result, replacing
/// any earlier one.
pub async fn analyze_and_persist(
    store: &dyn ContentStore,
    id: &str,
    keyword: &str,
) -> Result<AnalysisResult> {
    let snapshot = require_snapshot(store, id).await?;
    let result = score(&snapshot, keyword)?;
    store.save_result(id, &result).await?;
    info!(id, score = result.score, status = %result.status, "analysis saved");
    Ok(result)
}

pub async fn keywords_for(
    store: &dyn ContentStore,
    generator: &dyn TextGenerator,
    templates: &KeywordTemplates,
    id: &str,
) -> Result<Vec<KeywordCandidate>> {
    let snapshot = require_snapshot(store, id).await?;
    Ok(suggest_keywords(generator, &snapshot, templates).await?)
}

pub async fn rewrite_for(
    store: &dyn ContentStore,
    generator: &dyn TextGenerator,
    id: &str,
    keyword: &str,
) -> Result<RewriteSuggestions> {
    let snapshot = require_snapshot(store, id).await?;
    Ok(generate_rewrite_suggestions(generator, &snapshot, keyword).await?)
}

/// Which parts of a [`RewriteSuggestions`] bundle to write back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// Suggested title → content title.
    pub title: bool,
    /// Suggested title → meta title override.
    pub meta_title: bool,
    /// Suggested meta description → meta description override.
    pub meta_description: bool,
}

impl Selection {
    pub fn all() -> Self {
        Self {
            title: true,
            meta_title: true,
            meta_description: true,
        }
    }
}

/// Write the selected suggestions to the store. Fields the bundle does not
/// carry are skipped. Returns the fields actually written, in write order.
pub async fn apply_suggestions(
    store: &dyn ContentStore,
    id: &str,
    suggestions: &RewriteSuggestions,
    selection: Selection,
) -> Result<Vec<AppliedField>> {
    let mut writes: Vec<(AppliedField, &str)> = Vec::new();

    if let Some(title) = suggestions.title.as_deref() {
        if selection.title {
            writes.push((AppliedField::Title, title));
        }
        if selection.meta_title {
            writes.push((AppliedField::MetaTitle, title));
        }
    }
    if let Some(description) = suggestions.meta_description.as_deref() {
        if selection.meta_description {
            writes.push((AppliedField::MetaDescription, description));
        }
    }

    let mut applied = Vec::with_capacity(writes.len());
    for (field, value) in writes {
        store.apply_field(id, field, value).await?;
        info!(id, field = %field, "suggestion applied");
        applied.push(field);
    }
    Ok(applied)
}
