//! Template-based keyword candidates.
//!
//! Derives a fixed, ordered list of candidates from a snapshot's title. This
//! is the local fallback used whenever a text-generation capability is not
//! configured or fails to produce usable candidates.
//!
//! # Algorithm
//!
//! 1. Split the title on single spaces.
//! 2. `title` → 95, primary.
//! 3. With ≥ 2 tokens: first two tokens → 90, short-tail.
//! 4. With ≥ 3 tokens: first three tokens → 85, short-tail.
//! 5. `title + " " + suffix` → 80, long-tail.
//! 6. `prefix + " " + title` → 75, long-tail.
//!
//! A three-word title yields the title twice (primary and short-tail); the
//! duplicate is kept.
//!
//! ```rust
//! use onpage_core::keywords::{candidates_from_title, KeywordTemplates};
//!
//! let candidates = candidates_from_title("Shoes", &KeywordTemplates::default());
//! assert_eq!(candidates.len(), 3);
//! assert_eq!(candidates[0].phrase, "Shoes");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{ContentSnapshot, KeywordCandidate, Tier};

pub const DEFAULT_LONG_TAIL_SUFFIX: &str = "examples";
pub const DEFAULT_LONG_TAIL_PREFIX: &str = "how does it work";

/// Affixes for the two long-tail templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTemplates {
    #[serde(default = "default_suffix")]
    pub long_tail_suffix: String,
    #[serde(default = "default_prefix")]
    pub long_tail_prefix: String,
}

fn default_suffix() -> String {
    DEFAULT_LONG_TAIL_SUFFIX.to_string()
}

fn default_prefix() -> String {
    DEFAULT_LONG_TAIL_PREFIX.to_string()
}

impl Default for KeywordTemplates {
    fn default() -> Self {
        Self {
            long_tail_suffix: default_suffix(),
            long_tail_prefix: default_prefix(),
        }
    }
}

/// Candidates for a snapshot, using the default templates.
///
/// Any present title, including an empty one, runs through the template
/// algorithm unchanged.
///
/// # Errors
///
/// `InvalidInput` when the snapshot has no title.
pub fn generate_keyword_candidates(snapshot: &ContentSnapshot) -> Result<Vec<KeywordCandidate>> {
    generate_keyword_candidates_with(snapshot, &KeywordTemplates::default())
}

pub fn generate_keyword_candidates_with(
    snapshot: &ContentSnapshot,
    templates: &KeywordTemplates,
) -> Result<Vec<KeywordCandidate>> {
    let title = snapshot.require_title()?;
    Ok(candidates_from_title(title, templates))
}

/// The template algorithm on a bare title. Never fails.
pub fn candidates_from_title(title: &str, templates: &KeywordTemplates) -> Vec<KeywordCandidate> {
    let tokens: Vec<&str> = title.split(' ').collect();
    let mut out = Vec::with_capacity(5);

    out.push(KeywordCandidate::new(title, 95, Tier::Primary));
    if tokens.len() >= 2 {
        out.push(KeywordCandidate::new(tokens[..2].join(" "), 90, Tier::ShortTail));
    }
    if tokens.len() >= 3 {
        out.push(KeywordCandidate::new(tokens[..3].join(" "), 85, Tier::ShortTail));
    }
    out.push(KeywordCandidate::new(
        format!("{} {}", title, templates.long_tail_suffix),
        80,
        Tier::LongTail,
    ));
    out.push(KeywordCandidate::new(
        format!("{} {}", templates.long_tail_prefix, title),
        75,
        Tier::LongTail,
    ));

    out
}
