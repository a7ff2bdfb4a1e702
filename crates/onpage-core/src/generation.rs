//! Suggestion engine and the text-generation trait it is written against.
//!
//! The engine never decides on its own which generator to use; the caller
//! picks one (network-backed, template, or disabled) and hands it in.
//! Concrete HTTP generators live in the `onpage` app crate.
//!
//! # Fallback rules
//!
//! | Operation | Generator fails / returns nothing usable |
//! |-----------|-------------------------------------------|
//! | [`suggest_keywords`] | falls back to [`keywords::candidates_from_title`] |
//! | [`generate_rewrite_suggestions`] | error is returned to the caller |

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{Result, SeoError};
use crate::keywords::{self, KeywordTemplates};
use crate::models::{ContentSnapshot, FocusKeyword, KeywordCandidate, RewriteSuggestions};

/// A capability that produces keyword candidates and rewritten on-page
/// elements.
///
/// Implementations must not mutate anything reachable from the snapshot.
/// They may block on network I/O; callers apply their own timeout and may
/// drop the future to cancel.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Identifier used in logs (e.g. `"openai"`, `"template"`).
    fn name(&self) -> &str;

    /// Ranked keyword candidates for the snapshot.
    async fn keyword_candidates(&self, snapshot: &ContentSnapshot) -> Result<Vec<KeywordCandidate>>;

    /// Rewritten title, meta description, and content notes targeting
    /// `keyword`.
    async fn rewrite(
        &self,
        snapshot: &ContentSnapshot,
        keyword: &FocusKeyword,
    ) -> Result<RewriteSuggestions>;
}

/// Local, deterministic generator backed by the keyword templates.
///
/// Produces no rewrite text: [`rewrite`](TextGenerator::rewrite) always
/// reports `UpstreamUnavailable`.
#[derive(Debug, Clone, Default)]
pub struct TemplateGenerator {
    templates: KeywordTemplates,
}

impl TemplateGenerator {
    pub fn new(templates: KeywordTemplates) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &KeywordTemplates {
        &self.templates
    }
}

#[async_trait]
impl TextGenerator for TemplateGenerator {
    fn name(&self) -> &str {
        "template"
    }

    async fn keyword_candidates(&self, snapshot: &ContentSnapshot) -> Result<Vec<KeywordCandidate>> {
        keywords::generate_keyword_candidates_with(snapshot, &self.templates)
    }

    async fn rewrite(
        &self,
        _snapshot: &ContentSnapshot,
        _keyword: &FocusKeyword,
    ) -> Result<RewriteSuggestions> {
        Err(SeoError::unavailable(
            "template generator cannot produce rewrite suggestions; configure a text-generation provider",
        ))
    }
}

/// Ranked keyword candidates, preferring the generator and falling back to
/// the local templates.
///
/// The generator's output is used only if it is non-empty and every
/// candidate has a non-blank phrase and a score in `0..=100`. Otherwise the
/// failure is logged and the template list is returned.
///
/// # Errors
///
/// Only `InvalidInput`, when the snapshot has no title. The generator is not
/// called in that case.
pub async fn suggest_keywords(
    generator: &dyn TextGenerator,
    snapshot: &ContentSnapshot,
    templates: &KeywordTemplates,
) -> Result<Vec<KeywordCandidate>> {
    snapshot.require_title()?;

    let rejected = match generator.keyword_candidates(snapshot).await {
        Ok(candidates) => match validate_candidates(&candidates) {
            Ok(()) => {
                debug!(
                    generator = generator.name(),
                    count = candidates.len(),
                    "using generated keyword candidates"
                );
                return Ok(candidates);
            }
            Err(e) => e,
        },
        Err(e) => e,
    };

    warn!(generator = generator.name(), error = %rejected, "falling back to keyword templates");
    keywords::generate_keyword_candidates_with(snapshot, templates)
}

/// Check a generator's candidate list against the `(phrase, score, tier)`
/// contract.
pub fn validate_candidates(candidates: &[KeywordCandidate]) -> Result<()> {
    if candidates.is_empty() {
        return Err(SeoError::malformed("no keyword candidates returned"));
    }
    for c in candidates {
        if c.phrase.trim().is_empty() {
            return Err(SeoError::malformed("keyword candidate with empty phrase"));
        }
        if c.score > 100 {
            return Err(SeoError::malformed(format!(
                "keyword candidate '{}' has score {} outside 0..=100",
                c.phrase, c.score
            )));
        }
    }
    Ok(())
}

/// Rewrite suggestions for one (snapshot, keyword) pair.
///
/// There is no local fallback: any generator error is returned unchanged.
/// A successful response is normalized (blank fields dropped); an entirely
/// empty bundle is reported as `MalformedUpstreamResponse`.
pub async fn generate_rewrite_suggestions(
    generator: &dyn TextGenerator,
    snapshot: &ContentSnapshot,
    keyword: &str,
) -> Result<RewriteSuggestions> {
    let keyword = FocusKeyword::new(keyword)?;
    snapshot.require_title()?;
    snapshot.require_body()?;

    let bundle = match generator.rewrite(snapshot, &keyword).await {
        Ok(bundle) => bundle.normalized(),
        Err(e) => {
            if let SeoError::MalformedUpstreamResponse(_) = e {
                warn!(generator = generator.name(), error = %e, "rewrite response rejected");
            }
            return Err(e);
        }
    };

    if bundle.is_empty() {
        warn!(generator = generator.name(), "rewrite response was empty");
        return Err(SeoError::malformed("rewrite response contained no suggestions"));
    }

    debug!(
        generator = generator.name(),
        keyword = %keyword,
        notes = bundle.content_notes.len(),
        "rewrite suggestions ready"
    );
    Ok(bundle)
}
