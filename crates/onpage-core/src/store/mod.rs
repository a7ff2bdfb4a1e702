//! Content store abstraction.
//!
//! The [`ContentStore`] trait is the boundary to the host platform: it
//! supplies snapshots by id and accepts analysis results and applied field
//! values. The scorer and suggestion engine never call it; application-level
//! workflows do so on the caller's behalf.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.
//! Writes for the same id are last-write-wins; no per-id serialization is
//! implied.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{AnalysisResult, ContentSnapshot};

/// A snapshot field a rewrite suggestion can be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliedField {
    Title,
    MetaTitle,
    MetaDescription,
}

impl fmt::Display for AppliedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AppliedField::Title => "title",
            AppliedField::MetaTitle => "meta_title",
            AppliedField::MetaDescription => "meta_description",
        })
    }
}

/// Return a copy of `snapshot` with `field` set to `value`.
pub fn with_applied(snapshot: &ContentSnapshot, field: AppliedField, value: &str) -> ContentSnapshot {
    let mut updated = snapshot.clone();
    match field {
        AppliedField::Title => updated.title = Some(value.to_string()),
        AppliedField::MetaTitle => updated.existing_meta_title = Some(value.to_string()),
        AppliedField::MetaDescription => {
            updated.existing_meta_description = Some(value.to_string())
        }
    }
    updated
}

/// Abstract content store supplied by the host.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get_snapshot`](ContentStore::get_snapshot) | Fetch the current snapshot for an id |
/// | [`save_result`](ContentStore::save_result) | Persist the latest analysis, replacing any prior one |
/// | [`latest_result`](ContentStore::latest_result) | Read back the persisted analysis |
/// | [`apply_field`](ContentStore::apply_field) | Write an accepted suggestion back onto the content |
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get_snapshot(&self, id: &str) -> Result<Option<ContentSnapshot>>;

    async fn save_result(&self, id: &str, result: &AnalysisResult) -> Result<()>;

    async fn latest_result(&self, id: &str) -> Result<Option<AnalysisResult>>;

    /// Errors if no content exists for `id`.
    async fn apply_field(&self, id: &str, field: AppliedField, value: &str) -> Result<()>;
}
