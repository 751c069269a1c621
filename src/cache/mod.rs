//! Collector cache access.
//!
//! # Data Flow
//! ```text
//! snapshot file (collector JSON)
//!     → snapshot.rs (load into SnapshotCache)
//!     → CacheReader::get(service, operation, region, key)
//!     → entry.rs (Absent | Error | Data)
//!     → elbv2 sources interpret the payload
//! ```
//!
//! # Design Decisions
//! - The cache is read-only from the evaluator's point of view
//! - Absent, errored and present entries are distinct variants, never
//!   inferred from truthiness of the payload
//! - Readers are injected so tests can use fixture-backed snapshots

pub mod entry;
pub mod snapshot;
pub mod source_log;

pub use entry::CacheEntry;
pub use snapshot::{CacheError, SnapshotCache};
pub use source_log::{SourceLog, SourceRecord};

/// Read access to cached provider API responses.
pub trait CacheReader: Send + Sync {
    /// Look up one cached response.
    ///
    /// `resource_key` selects a per-resource entry below the region node
    /// (e.g. a load balancer DNS name). `None` reads the region node itself.
    fn get(
        &self,
        service: &str,
        operation: &str,
        region: &str,
        resource_key: Option<&str>,
    ) -> CacheEntry;
}
