//! Scan driver.
//!
//! # Data Flow
//! ```text
//! Scanner::scan(regions)
//!     → one blocking task per region (bounded by max_concurrent_regions)
//!     → Rule::evaluate_region(cache, region)
//!     → merged in region order
//!     → ScanReport { scan_id, findings, summary, sources }
//! ```
//!
//! # Design Decisions
//! - Regions share nothing mutable; each task owns its output until merge
//! - Output order is the configured region order regardless of completion order

pub mod report;
pub mod scanner;

pub use report::{ScanReport, StatusSummary};
pub use scanner::Scanner;
