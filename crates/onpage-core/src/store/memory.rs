//! In-memory [`ContentStore`] implementation for testing and WASM targets.
//!
//! Uses `HashMap`s behind `std::sync::RwLock`.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use crate::models::{AnalysisResult, ContentSnapshot};

use super::{with_applied, AppliedField, ContentStore};

/// In-memory store for testing and WASM environments.
pub struct InMemoryStore {
    snapshots: RwLock<HashMap<String, ContentSnapshot>>,
    results: RwLock<HashMap<String, AnalysisResult>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(HashMap::new()),
            results: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a snapshot, keyed by its `id`.
    pub fn insert(&self, snapshot: ContentSnapshot) -> Result<()> {
        let mut snapshots = self.snapshots.write().map_err(|e| anyhow!("{}", e))?;
        snapshots.insert(snapshot.id.clone(), snapshot);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.snapshots.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn get_snapshot(&self, id: &str) -> Result<Option<ContentSnapshot>> {
        let snapshots = self.snapshots.read().map_err(|e| anyhow!("{}", e))?;
        Ok(snapshots.get(id).cloned())
    }

    async fn save_result(&self, id: &str, result: &AnalysisResult) -> Result<()> {
        let mut results = self.results.write().map_err(|e| anyhow!("{}", e))?;
        results.insert(id.to_string(), result.clone());
        Ok(())
    }

    async fn latest_result(&self, id: &str) -> Result<Option<AnalysisResult>> {
        let results = self.results.read().map_err(|e| anyhow!("{}", e))?;
        Ok(results.get(id).cloned())
    }

    async fn apply_field(&self, id: &str, field: AppliedField, value: &str) -> Result<()> {
        let mut snapshots = self.snapshots.write().map_err(|e| anyhow!("{}", e))?;
        let Some(current) = snapshots.get(id) else {
            bail!("content not found: {}", id);
        };
        let updated = with_applied(current, field, value);
        snapshots.insert(id.to_string(), updated);
        Ok(())
    }
}
