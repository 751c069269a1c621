//! ELBv2 (Application/Network load balancer) data access.
//!
//! # Data Flow
//! ```text
//! sources.rs
//!     load_balancers(region)
//!     → target_groups(lb.dns_name)
//!     → target_health(tg.arn)
//! aggregator.rs
//!     all target health of one load balancer → HealthVerdict
//! ```
//!
//! # Design Decisions
//! - Every level reports Absent/Error/malformed as a FetchError value
//! - Zero target groups is a distinct outcome, not a fetch failure
//! - Records keep the provider's field names via serde renames

pub mod aggregator;
pub mod sources;
pub mod types;

pub use aggregator::{aggregate, HealthVerdict};
pub use sources::{FetchError, FetchKind, LoadBalancerLookup, TargetGroupLookup};
pub use types::{LoadBalancer, TargetGroup, TargetHealthDescription, TargetHealthState};
