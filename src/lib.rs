//! ELBv2 unhealthy instance compliance rule.
//!
//! Walks cached describe-load-balancers, describe-target-groups and
//! describe-target-health results for each region and reports, per
//! Application/Network load balancer, whether any registered target is
//! unhealthy.

pub mod cache;
pub mod config;
pub mod elbv2;
pub mod findings;
pub mod observability;
pub mod rule;
pub mod scan;

pub use cache::{CacheEntry, CacheReader, SnapshotCache};
pub use config::ScanConfig;
pub use findings::{Finding, Status};
pub use rule::{Rule, RuleOutput, Settings, UnhealthyInstanceRule};
pub use scan::{ScanReport, Scanner};
