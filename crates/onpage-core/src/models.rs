//! Core data models for Onpage.
//!
//! These types are the values that flow between the caller's content store,
//! the [`scorer`](crate::score), and the [`suggestion engine`](crate::generation).
//! None of them is ever mutated by the core: every operation borrows a
//! [`ContentSnapshot`] and returns fresh values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, SeoError};

/// Immutable view of one content item at analysis time.
///
/// `title` and `body_markup` are optional at the deserialization boundary so
/// that a record missing them can be rejected with
/// [`SeoError::InvalidInput`] instead of failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSnapshot {
    /// Identifier owned by the caller's store.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "bodyMarkup")]
    pub body_markup: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Canonical absolute URL.
    #[serde(default)]
    pub url: String,
    #[serde(default, alias = "existingMetaTitle")]
    pub existing_meta_title: Option<String>,
    #[serde(default, alias = "existingMetaDescription")]
    pub existing_meta_description: Option<String>,
    /// Base URL used to tell internal links from external ones.
    #[serde(default, alias = "siteBaseUrl")]
    pub site_base_url: String,
}

impl ContentSnapshot {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body_markup: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            body_markup: Some(body_markup.into()),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_site_base_url(mut self, base: impl Into<String>) -> Self {
        self.site_base_url = base.into();
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn with_meta_title(mut self, meta_title: impl Into<String>) -> Self {
        self.existing_meta_title = Some(meta_title.into());
        self
    }

    pub fn with_meta_description(mut self, meta_description: impl Into<String>) -> Self {
        self.existing_meta_description = Some(meta_description.into());
        self
    }

    /// The title, or `InvalidInput` when the record carries none.
    pub fn require_title(&self) -> Result<&str> {
        self.title
            .as_deref()
            .ok_or_else(|| SeoError::invalid("snapshot.title is required"))
    }

    /// The body markup, or `InvalidInput` when the record carries none.
    pub fn require_body(&self) -> Result<&str> {
        self.body_markup
            .as_deref()
            .ok_or_else(|| SeoError::invalid("snapshot.body_markup is required"))
    }

    /// Meta title override, falling back to the title.
    pub fn effective_meta_title(&self) -> Option<&str> {
        non_blank(self.existing_meta_title.as_deref()).or(self.title.as_deref())
    }

    /// Meta description override, falling back to the excerpt.
    pub fn effective_meta_description(&self) -> Option<&str> {
        non_blank(self.existing_meta_description.as_deref()).or(self.excerpt.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// A validated focus keyword: non-empty, matched case-insensitively as a
/// literal phrase.
///
/// Construction trims leading and trailing whitespace, so `" shoes "` is
/// the keyword `shoes` and matches wherever `shoes` does; surrounding
/// spaces are never part of the phrase. Inner whitespace is kept as given
/// for substring signals, while the density count accepts any whitespace
/// run between words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusKeyword {
    phrase: String,
    lowered: String,
}

impl FocusKeyword {
    /// Trim `raw` and reject it if nothing is left.
    pub fn new(raw: &str) -> Result<Self> {
        let phrase = raw.trim();
        if phrase.is_empty() {
            return Err(SeoError::invalid("keyword must not be empty"));
        }
        Ok(Self {
            phrase: phrase.to_string(),
            lowered: phrase.to_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.phrase
    }

    /// Lower-cased form used for every comparison.
    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    /// Case-insensitive substring test (no word-boundary requirement).
    pub fn is_in(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.lowered)
    }
}

impl fmt::Display for FocusKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.phrase)
    }
}

/// One independently scored SEO heuristic.
///
/// Variant order is the order signals are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    KeywordInTitle,
    KeywordInMetaTitle,
    KeywordInMetaDescription,
    KeywordInUrl,
    KeywordDensity,
    KeywordInH1,
    KeywordInH2,
    ContentLength,
    ImageAltKeyword,
    ExternalLink,
    InternalLink,
    KeywordInIntroduction,
}

impl Signal {
    pub const ALL: [Signal; 12] = [
        Signal::KeywordInTitle,
        Signal::KeywordInMetaTitle,
        Signal::KeywordInMetaDescription,
        Signal::KeywordInUrl,
        Signal::KeywordDensity,
        Signal::KeywordInH1,
        Signal::KeywordInH2,
        Signal::ContentLength,
        Signal::ImageAltKeyword,
        Signal::ExternalLink,
        Signal::InternalLink,
        Signal::KeywordInIntroduction,
    ];

    /// Highest number of points this signal can award.
    pub fn max_points(self) -> u8 {
        match self {
            Signal::KeywordInTitle | Signal::KeywordDensity => 15,
            Signal::KeywordInMetaTitle
            | Signal::KeywordInMetaDescription
            | Signal::KeywordInH1
            | Signal::ContentLength => 10,
            Signal::KeywordInUrl
            | Signal::KeywordInH2
            | Signal::ImageAltKeyword
            | Signal::ExternalLink
            | Signal::InternalLink
            | Signal::KeywordInIntroduction => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Signal::KeywordInTitle => "keyword_in_title",
            Signal::KeywordInMetaTitle => "keyword_in_meta_title",
            Signal::KeywordInMetaDescription => "keyword_in_meta_description",
            Signal::KeywordInUrl => "keyword_in_url",
            Signal::KeywordDensity => "keyword_density",
            Signal::KeywordInH1 => "keyword_in_h1",
            Signal::KeywordInH2 => "keyword_in_h2",
            Signal::ContentLength => "content_length",
            Signal::ImageAltKeyword => "image_alt_keyword",
            Signal::ExternalLink => "external_link",
            Signal::InternalLink => "internal_link",
            Signal::KeywordInIntroduction => "keyword_in_introduction",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Qualitative status derived from the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Optimized,
    PartiallyOptimized,
    NeedsOptimization,
}

impl Status {
    /// `>= 80` optimized, `>= 60` partially optimized, otherwise needs work.
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Status::Optimized,
            60..=79 => Status::PartiallyOptimized,
            _ => Status::NeedsOptimization,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Optimized => "optimized",
            Status::PartiallyOptimized => "partially_optimized",
            Status::NeedsOptimization => "needs_optimization",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the scorer. Created fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// `0..=100`.
    pub score: u8,
    pub status: Status,
    /// Points awarded per signal; every signal is present, unmet ones at 0.
    pub signals: BTreeMap<Signal, u8>,
    /// Whitespace-separated words in the markup-stripped body.
    pub word_count: usize,
    /// Keyword density in percent; `None` when the body has no words.
    pub keyword_density: Option<f64>,
    pub computed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn points(&self, signal: Signal) -> u8 {
        self.signals.get(&signal).copied().unwrap_or(0)
    }
}

/// Specificity class of a keyword candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Primary,
    #[serde(alias = "short_tail")]
    ShortTail,
    #[serde(alias = "long_tail")]
    LongTail,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Primary => "primary",
            Tier::ShortTail => "short-tail",
            Tier::LongTail => "long-tail",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCandidate {
    pub phrase: String,
    /// `0..=100`.
    pub score: u8,
    pub tier: Tier,
}

impl KeywordCandidate {
    pub fn new(phrase: impl Into<String>, score: u8, tier: Tier) -> Self {
        Self {
            phrase: phrase.into(),
            score,
            tier,
        }
    }
}

/// Rewritten on-page elements for one (snapshot, keyword) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteSuggestions {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "metaDescription")]
    pub meta_description: Option<String>,
    #[serde(default, alias = "contentNotes")]
    pub content_notes: Vec<String>,
}

impl RewriteSuggestions {
    /// Trim every field, turning blank strings into `None` and dropping
    /// blank notes.
    pub fn normalized(self) -> Self {
        let clean = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };
        Self {
            title: clean(self.title),
            meta_description: clean(self.meta_description),
            content_notes: self
                .content_notes
                .into_iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.meta_description.is_none() && self.content_notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_keyword_trims_surrounding_whitespace() {
        let kw = FocusKeyword::new("  Running Shoes \t").unwrap();
        assert_eq!(kw.as_str(), "Running Shoes");
        assert_eq!(kw.lowered(), "running shoes");
        assert!(kw.is_in("red running shoes"));
        assert!(!kw.is_in("running shoe"));
    }

    #[test]
    fn test_status_thresholds_are_inclusive_lower_bounds() {
        assert_eq!(Status::from_score(100), Status::Optimized);
        assert_eq!(Status::from_score(80), Status::Optimized);
        assert_eq!(Status::from_score(79), Status::PartiallyOptimized);
        assert_eq!(Status::from_score(60), Status::PartiallyOptimized);
        assert_eq!(Status::from_score(59), Status::NeedsOptimization);
        assert_eq!(Status::from_score(0), Status::NeedsOptimization);
    }

    #[test]
    fn test_signal_max_points_sum_to_cap() {
        let total: u32 = Signal::ALL.iter().map(|s| s.max_points() as u32).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_focus_keyword_rejects_blank() {
        assert!(matches!(FocusKeyword::new(""), Err(SeoError::InvalidInput(_))));
        assert!(matches!(FocusKeyword::new("   "), Err(SeoError::InvalidInput(_))));
        let kw = FocusKeyword::new("  Running Shoes ").unwrap();
        assert_eq!(kw.as_str(), "Running Shoes");
        assert_eq!(kw.lowered(), "running shoes");
    }

    #[test]
    fn test_effective_meta_fallbacks() {
        let snap = ContentSnapshot::new("1", "Title", "<p>x</p>").with_excerpt("Excerpt");
        assert_eq!(snap.effective_meta_title(), Some("Title"));
        assert_eq!(snap.effective_meta_description(), Some("Excerpt"));

        let snap = snap.with_meta_title("Meta").with_meta_description("Desc");
        assert_eq!(snap.effective_meta_title(), Some("Meta"));
        assert_eq!(snap.effective_meta_description(), Some("Desc"));
    }

    #[test]
    fn test_status_and_tier_wire_names() {
        assert_eq!(
            serde_json::to_string(&Status::PartiallyOptimized).unwrap(),
            "\"partially_optimized\""
        );
        assert_eq!(serde_json::to_string(&Tier::ShortTail).unwrap(), "\"short-tail\"");
        assert_eq!(serde_json::to_string(&Signal::KeywordInH1).unwrap(), "\"keyword_in_h1\"");
    }

    #[test]
    fn test_snapshot_accepts_camel_case_fields() {
        let snap: ContentSnapshot = serde_json::from_str(
            r#"{"id":"7","title":"T","bodyMarkup":"<p>b</p>","siteBaseUrl":"https://a.test"}"#,
        )
        .unwrap();
        assert_eq!(snap.body_markup.as_deref(), Some("<p>b</p>"));
        assert_eq!(snap.site_base_url, "https://a.test");
    }

    #[test]
    fn test_rewrite_normalized_drops_blanks() {
        let bundle = RewriteSuggestions {
            title: Some("  ".into()),
            meta_description: Some(" New description ".into()),
            content_notes: vec!["".into(), " Add an H2 ".into()],
        }
        .normalized();
        assert_eq!(bundle.title, None);
        assert_eq!(bundle.meta_description.as_deref(), Some("New description"));
        assert_eq!(bundle.content_notes, vec!["Add an H2".to_string()]);
    }
}
