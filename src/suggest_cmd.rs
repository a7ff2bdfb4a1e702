//! `onpage keywords` and `onpage rewrite`: suggestion commands.

use anyhow::Result;
use onpage_core::generation::{generate_rewrite_suggestions, suggest_keywords};
use std::path::Path;

use crate::config::Config;
use crate::generation::create_generator;
use crate::resolve::load_snapshot;

/// CLI entry point: prints ranked keyword candidates.
///
/// Falls back to the keyword templates whenever the configured provider
/// fails, so this only errors on unreadable input or a missing title.
pub async fn run_keywords(config: &Config, path: &Path, json: bool) -> Result<()> {
    let snapshot = load_snapshot(path, config)?;
    let generator = create_generator(&config.generation, &config.keywords)?;
    let candidates = suggest_keywords(generator.as_ref(), &snapshot, &config.keywords).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
        return Ok(());
    }

    if candidates.is_empty() {
        println!("No candidates.");
        return Ok(());
    }

    for (i, c) in candidates.iter().enumerate() {
        println!("{}. [{:>3}] {:<10} {}", i + 1, c.score, c.tier.as_str(), c.phrase);
    }

    Ok(())
}

/// CLI entry point: prints rewrite suggestions for a keyword.
///
/// Upstream failures are returned as errors (non-zero exit); there is no
/// local fallback for rewrite text.
pub async fn run_rewrite(config: &Config, path: &Path, keyword: &str, json: bool) -> Result<()> {
    let snapshot = load_snapshot(path, config)?;
    let generator = create_generator(&config.generation, &config.keywords)?;
    let bundle = generate_rewrite_suggestions(generator.as_ref(), &snapshot, keyword).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
        return Ok(());
    }

    println!("--- Rewrite ({}) ---", keyword.trim());
    if let Some(ref title) = bundle.title {
        println!("title:            {}", title);
    }
    if let Some(ref description) = bundle.meta_description {
        println!("meta description: {}", description);
    }
    if !bundle.content_notes.is_empty() {
        println!();
        println!("--- Content notes ({}) ---", bundle.content_notes.len());
        for note in &bundle.content_notes {
            println!("- {}", note);
        }
    }

    Ok(())
}
