//! In-memory collector snapshot.

use dashmap::DashMap;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::cache::{CacheEntry, CacheReader};

/// Errors raised while loading a snapshot.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Snapshot file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Snapshot JSON does not follow the service/operation/region layout.
    #[error("Invalid snapshot layout: {0}")]
    Layout(String),
}

type RegionKey = (String, String, String);

/// A read-only view over collected provider responses.
///
/// Region nodes are stored as-is; entries are decoded on lookup.
#[derive(Debug, Clone, Default)]
pub struct SnapshotCache {
    inner: Arc<DashMap<RegionKey, Value>>,
}

impl SnapshotCache {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot from a collector JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, CacheError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let value: Value = serde_json::from_reader(reader)?;
        let cache = Self::from_value(value)?;
        tracing::info!(path = %path.display(), regions = cache.len(), "Loaded cache snapshot");
        Ok(cache)
    }

    /// Build a snapshot from `{service: {operation: {region: node}}}`.
    pub fn from_value(value: Value) -> Result<Self, CacheError> {
        let Value::Object(services) = value else {
            return Err(CacheError::Layout("top level must be an object".into()));
        };

        let cache = Self::new();
        for (service, operations) in services {
            let Value::Object(operations) = operations else {
                return Err(CacheError::Layout(format!("service '{}' must be an object", service)));
            };
            for (operation, regions) in operations {
                let Value::Object(regions) = regions else {
                    return Err(CacheError::Layout(format!(
                        "operation '{}.{}' must be an object",
                        service, operation
                    )));
                };
                for (region, node) in regions {
                    cache.insert_region(&service, &operation, &region, node);
                }
            }
        }
        Ok(cache)
    }

    /// Store the raw node for one service/operation/region.
    pub fn insert_region(&self, service: &str, operation: &str, region: &str, node: Value) {
        self.inner.insert(
            (service.to_string(), operation.to_string(), region.to_string()),
            node,
        );
    }

    /// Number of stored region nodes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True if nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl CacheReader for SnapshotCache {
    fn get(
        &self,
        service: &str,
        operation: &str,
        region: &str,
        resource_key: Option<&str>,
    ) -> CacheEntry {
        let key = (service.to_string(), operation.to_string(), region.to_string());
        let Some(node) = self.inner.get(&key) else {
            return CacheEntry::Absent;
        };

        match resource_key {
            None => CacheEntry::from_node(Some(node.value())),
            Some(resource) => CacheEntry::from_node(node.value().get(resource)),
        }
    }
}
