//! Client-observed suggestion lifecycle for one content item.
//!
//! Two independent tracks:
//!
//! ```text
//! keywords: Idle ──request──▶ Requested ──ready──▶ Ready
//! rewrite:  Idle ──request──▶ Requested ──ok──▶ Ready
//!                                       └─err──▶ Failed
//! ```
//!
//! A new request is accepted from any state, so both tracks are
//! restartable. Completions are only accepted while a request is pending;
//! a late completion for a superseded request is ignored.

use serde::Serialize;

use crate::error::SeoError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordPhase {
    #[default]
    Idle,
    Requested,
    Ready,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RewritePhase {
    #[default]
    Idle,
    Requested,
    Ready,
    Failed,
}

/// Per-item view of both suggestion tracks. Owned by the caller; the engine
/// itself keeps no state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SuggestionState {
    pub keywords: KeywordPhase,
    pub rewrite: RewritePhase,
}

impl SuggestionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_keywords(&mut self) {
        self.keywords = KeywordPhase::Requested;
    }

    /// Returns `false` if no keyword request was pending.
    pub fn keywords_ready(&mut self) -> bool {
        if self.keywords != KeywordPhase::Requested {
            return false;
        }
        self.keywords = KeywordPhase::Ready;
        true
    }

    pub fn request_rewrite(&mut self) {
        self.rewrite = RewritePhase::Requested;
    }

    /// Record a rewrite outcome. Returns `false` if no rewrite request was
    /// pending.
    pub fn rewrite_finished<T>(&mut self, outcome: &Result<T, SeoError>) -> bool {
        if self.rewrite != RewritePhase::Requested {
            return false;
        }
        self.rewrite = if outcome.is_ok() {
            RewritePhase::Ready
        } else {
            RewritePhase::Failed
        };
        true
    }
}
