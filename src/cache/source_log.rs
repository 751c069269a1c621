//! Record of the cache entries an evaluation consulted.

use serde::Serialize;

use crate::cache::{CacheEntry, CacheReader};

/// One cache lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRecord {
    pub service: String,
    pub operation: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_key: Option<String>,
    /// `absent`, `error` or `data`.
    pub outcome: &'static str,
}

/// Ordered list of lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SourceLog {
    records: Vec<SourceRecord>,
}

impl SourceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read through `reader` and record the outcome.
    pub fn fetch(
        &mut self,
        reader: &dyn CacheReader,
        service: &str,
        operation: &str,
        region: &str,
        resource_key: Option<&str>,
    ) -> CacheEntry {
        let entry = reader.get(service, operation, region, resource_key);
        self.records.push(SourceRecord {
            service: service.to_string(),
            operation: operation.to_string(),
            region: region.to_string(),
            resource_key: resource_key.map(str::to_string),
            outcome: entry.kind(),
        });
        entry
    }

    pub fn append(&mut self, other: SourceLog) {
        self.records.extend(other.records);
    }

    pub fn records(&self) -> &[SourceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
