//! Prompt construction and response parsing for chat-style generators.
//!
//! Both prompts ask the model for a bare JSON object. Responses are parsed
//! leniently (surrounding code fences are stripped) but strictly typed:
//! anything that does not deserialize into the contract is a
//! `MalformedUpstreamResponse`.

use onpage_core::markup;
use onpage_core::{ContentSnapshot, FocusKeyword, KeywordCandidate, RewriteSuggestions, SeoError, Tier};
use serde::Deserialize;

/// Upper bound on body text included in a prompt, in bytes.
pub const MAX_BODY_BYTES: usize = 6000;

pub const SYSTEM_PROMPT: &str = "You are an on-page SEO assistant. \
Answer with a single JSON object and nothing else.";

pub fn keyword_prompt(snapshot: &ContentSnapshot) -> String {
    format!(
        "Suggest focus keywords for the page below.\n\
         Return JSON: {{\"candidates\": [{{\"phrase\": string, \"score\": integer 0-100, \
         \"tier\": \"primary\" | \"short-tail\" | \"long-tail\"}}]}}, \
         ordered by descending score.\n\n{}",
        page_context(snapshot)
    )
}

pub fn rewrite_prompt(snapshot: &ContentSnapshot, keyword: &FocusKeyword) -> String {
    format!(
        "Rewrite the page's on-page elements to target the focus keyword \"{}\".\n\
         Return JSON: {{\"title\": string, \"metaDescription\": string (max 160 characters), \
         \"contentNotes\": [string]}} where contentNotes are concrete edits to the body.\n\n{}",
        keyword,
        page_context(snapshot)
    )
}

fn page_context(snapshot: &ContentSnapshot) -> String {
    let body = snapshot
        .body_markup
        .as_deref()
        .map(markup::strip_markup)
        .unwrap_or_default();
    let body = body.split_whitespace().collect::<Vec<_>>().join(" ");

    format!(
        "Title: {}\nMeta title: {}\nMeta description: {}\nURL: {}\nBody:\n{}",
        snapshot.title.as_deref().unwrap_or(""),
        snapshot.effective_meta_title().unwrap_or(""),
        snapshot.effective_meta_description().unwrap_or(""),
        snapshot.url,
        truncate_to_char_boundary(&body, MAX_BODY_BYTES)
    )
}

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// Strip markdown code fences from a model response.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[derive(Deserialize)]
struct CandidatesPayload {
    candidates: Vec<CandidatePayload>,
}

#[derive(Deserialize)]
struct CandidatePayload {
    phrase: String,
    score: f64,
    tier: Tier,
}

pub fn parse_candidates(content: &str) -> Result<Vec<KeywordCandidate>, SeoError> {
    let payload: CandidatesPayload = serde_json::from_str(strip_code_blocks(content))
        .map_err(|e| SeoError::malformed(format!("keyword candidates: {}", e)))?;

    payload
        .candidates
        .into_iter()
        .map(|c| {
            if !(0.0..=100.0).contains(&c.score) {
                return Err(SeoError::malformed(format!(
                    "keyword candidate '{}' has score {} outside 0..=100",
                    c.phrase, c.score
                )));
            }
            Ok(KeywordCandidate::new(c.phrase, c.score.round() as u8, c.tier))
        })
        .collect()
}

pub fn parse_rewrite(content: &str) -> Result<RewriteSuggestions, SeoError> {
    serde_json::from_str(strip_code_blocks(content))
        .map_err(|e| SeoError::malformed(format!("rewrite suggestions: {}", e)))
}
