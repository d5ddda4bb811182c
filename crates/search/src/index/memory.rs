//! In-memory index
//!
//! Holds immutable record snapshots keyed by index name. Fixture files are
//! JSON arrays of records named `<index name>.json`.

use super::{IndexProvider, IndexSession};
use crate::predicate::Predicate;
use crate::record::SearchRecord;
use crate::resolvers::ItemTree;
use anyhow::Context;
use itemsearch_common::errors::{AppError, Result};
use itemsearch_common::metrics;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Index provider over records held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryIndexProvider {
    indexes: BTreeMap<String, Arc<Vec<SearchRecord>>>,
}

impl MemoryIndexProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an index
    pub fn with_index(mut self, name: impl Into<String>, records: Vec<SearchRecord>) -> Self {
        self.insert(name, records);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, records: Vec<SearchRecord>) {
        self.indexes.insert(name.into(), Arc::new(records));
    }

    /// Load every `*.json` file in `dir` as an index named after the file stem
    pub fn load_dir(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        let mut provider = Self::new();

        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("reading index directory {}", dir.display()))?;

        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let records: Vec<SearchRecord> = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", path.display()))?;

            info!(index = %name, records = records.len(), "Loaded index");
            provider.insert(name, records);
        }

        Ok(provider)
    }

    pub fn index_names(&self) -> impl Iterator<Item = &str> {
        self.indexes.keys().map(String::as_str)
    }

    pub fn record_count(&self, name: &str) -> Option<usize> {
        self.indexes.get(name).map(|records| records.len())
    }

    /// Item tree over every record of every index
    pub fn item_tree(&self) -> ItemTree {
        ItemTree::from_records(self.indexes.values().flat_map(|records| records.iter()))
    }
}

#[async_trait::async_trait]
impl IndexProvider for MemoryIndexProvider {
    async fn open_session(&self, index_name: &str) -> Result<Box<dyn IndexSession>> {
        let records = self
            .indexes
            .get(index_name)
            .cloned()
            .ok_or_else(|| AppError::index_unavailable(index_name, "index is not loaded"))?;

        Ok(Box::new(MemorySession::open(index_name, records)))
    }
}

/// Session over one in-memory snapshot
#[derive(Debug)]
pub struct MemorySession {
    index: String,
    records: Arc<Vec<SearchRecord>>,
}

impl MemorySession {
    fn open(index: &str, records: Arc<Vec<SearchRecord>>) -> Self {
        metrics::record_session_opened(index);
        debug!(index = %index, "Index session opened");
        Self {
            index: index.to_string(),
            records,
        }
    }
}

#[async_trait::async_trait]
impl IndexSession for MemorySession {
    fn index_name(&self) -> &str {
        &self.index
    }

    async fn query(&self, predicate: &Predicate) -> Result<Vec<SearchRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|record| predicate.evaluate(record))
            .cloned()
            .collect())
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        metrics::record_session_released(&self.index);
        debug!(index = %self.index, "Index session released");
    }
}
