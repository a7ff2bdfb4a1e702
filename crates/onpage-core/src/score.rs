//! On-page SEO scorer.
//!
//! A pure function of a [`ContentSnapshot`] and a focus keyword. Each signal
//! is evaluated independently and awards a fixed number of points; the final
//! score is the sum capped at 100, and the status is derived from the score.
//!
//! # Signals
//!
//! | Signal | Condition | Points |
//! |--------|-----------|--------|
//! | `keyword_in_title` | substring of the title | 15 |
//! | `keyword_in_meta_title` | substring of meta title (override, else title) | 10 |
//! | `keyword_in_meta_description` | substring of meta description (override, else excerpt) | 10 |
//! | `keyword_in_url` | substring of the URL | 5 |
//! | `keyword_density` | whole-word density in stripped body: 1–3% → 15, (0,1)% → 10, >3% → 5 | 0–15 |
//! | `keyword_in_h1` | substring inside any `<h1>` | 10 |
//! | `keyword_in_h2` | substring inside any `<h2>` | 5 |
//! | `content_length` | ≥ 300 words → 10, 100–299 → 5 | 0–10 |
//! | `image_alt_keyword` | substring of any `<img alt>` | 5 |
//! | `external_link` | any absolute link off-site | 5 |
//! | `internal_link` | any link containing the site base URL | 5 |
//! | `keyword_in_introduction` | substring within the first 100 body words | 5 |
//!
//! The first eleven rows are the classic on-page checklist and total 95.
//! `keyword_in_introduction` supplies the remaining 5, so a page meeting
//! every row scores exactly [`MAX_SCORE`]. Compared with the eleven-row
//! table alone, it can lift a page across a status threshold (75 → 80).
//!
//! Title, meta, URL, heading, and alt signals use plain case-insensitive
//! substring matching; only the density signal requires word boundaries, so
//! `shoes` matches the URL `/red-shoestring` but adds nothing to density.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::Result;
use crate::markup::{self, LinkKind};
use crate::models::{AnalysisResult, ContentSnapshot, FocusKeyword, Signal, Status};

/// Hard ceiling on the final score.
pub const MAX_SCORE: u8 = 100;

/// Number of leading body words that count as the introduction.
pub const INTRODUCTION_WORDS: usize = 100;

/// Score a snapshot against a keyword, stamping the result with the current
/// time.
///
/// # Errors
///
/// [`SeoError::InvalidInput`](crate::SeoError::InvalidInput) when the keyword
/// is blank or the snapshot has no title or body. A snapshot that matches
/// nothing is not an error; it scores 0.
pub fn score(snapshot: &ContentSnapshot, keyword: &str) -> Result<AnalysisResult> {
    score_at(snapshot, keyword, Utc::now())
}

/// Same as [`score`], with an explicit timestamp.
pub fn score_at(
    snapshot: &ContentSnapshot,
    keyword: &str,
    computed_at: DateTime<Utc>,
) -> Result<AnalysisResult> {
    let keyword = FocusKeyword::new(keyword)?;
    let title = snapshot.require_title()?;
    let body = snapshot.require_body()?;

    let text = markup::strip_markup(body);
    let word_count = markup::word_count(&text);
    let matches = markup::count_whole_word(&text, &keyword)?;
    let density = keyword_density(matches, word_count);

    let mut signals = BTreeMap::new();
    let mut award = |signal: Signal, points: u8| {
        signals.insert(signal, points);
    };

    award(Signal::KeywordInTitle, flag(Signal::KeywordInTitle, keyword.is_in(title)));
    award(
        Signal::KeywordInMetaTitle,
        flag(
            Signal::KeywordInMetaTitle,
            snapshot
                .effective_meta_title()
                .is_some_and(|t| keyword.is_in(t)),
        ),
    );
    award(
        Signal::KeywordInMetaDescription,
        flag(
            Signal::KeywordInMetaDescription,
            snapshot
                .effective_meta_description()
                .is_some_and(|d| keyword.is_in(d)),
        ),
    );
    award(Signal::KeywordInUrl, flag(Signal::KeywordInUrl, keyword.is_in(&snapshot.url)));
    award(Signal::KeywordDensity, density_points(matches, word_count));
    award(
        Signal::KeywordInH1,
        flag(Signal::KeywordInH1, in_heading(body, 1, &keyword)),
    );
    award(
        Signal::KeywordInH2,
        flag(Signal::KeywordInH2, in_heading(body, 2, &keyword)),
    );
    award(Signal::ContentLength, length_points(word_count));
    award(
        Signal::ImageAltKeyword,
        flag(
            Signal::ImageAltKeyword,
            markup::image_alts(body).iter().any(|alt| keyword.is_in(alt)),
        ),
    );

    let kinds: Vec<LinkKind> = markup::link_hrefs(body)
        .into_iter()
        .map(|href| markup::classify_link(href, &snapshot.site_base_url))
        .collect();
    award(
        Signal::ExternalLink,
        flag(Signal::ExternalLink, kinds.contains(&LinkKind::External)),
    );
    award(
        Signal::InternalLink,
        flag(Signal::InternalLink, kinds.contains(&LinkKind::Internal)),
    );
    award(
        Signal::KeywordInIntroduction,
        flag(
            Signal::KeywordInIntroduction,
            keyword.is_in(&markup::leading_words(&text, INTRODUCTION_WORDS)),
        ),
    );

    let total: u32 = signals.values().map(|&p| p as u32).sum();
    let score = total.min(MAX_SCORE as u32) as u8;
    let status = Status::from_score(score);

    debug!(
        id = %snapshot.id,
        keyword = %keyword,
        score,
        status = %status,
        word_count,
        matches,
        "scored snapshot"
    );

    Ok(AnalysisResult {
        score,
        status,
        signals,
        word_count,
        keyword_density: density,
        computed_at,
    })
}

fn flag(signal: Signal, hit: bool) -> u8 {
    if hit {
        signal.max_points()
    } else {
        0
    }
}

fn in_heading(markup: &str, level: u8, keyword: &FocusKeyword) -> bool {
    markup::heading_contents(markup, level)
        .iter()
        .any(|inner| keyword.is_in(inner))
}

/// Keyword density in percent, or `None` for an empty body.
pub fn keyword_density(matches: usize, word_count: usize) -> Option<f64> {
    if word_count == 0 {
        None
    } else {
        Some(matches as f64 * 100.0 / word_count as f64)
    }
}

/// Points for keyword density.
///
/// Boundaries are compared in integer arithmetic so that exactly 1% and
/// exactly 3% land in the 15-point band.
pub fn density_points(matches: usize, word_count: usize) -> u8 {
    if word_count == 0 || matches == 0 {
        return 0;
    }
    let scaled = matches * 100;
    if scaled < word_count {
        10
    } else if scaled <= word_count * 3 {
        15
    } else {
        5
    }
}

/// Points for body length in words.
pub fn length_points(word_count: usize) -> u8 {
    match word_count {
        300.. => 10,
        100..=299 => 5,
        _ => 0,
    }
}
