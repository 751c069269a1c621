//! Compliance findings.
//!
//! # Design Decisions
//! - Status codes are a closed enum shared with the reporting layer
//! - Findings are immutable once built; the builder is the only constructor
//!   used by rules

pub mod finding;
pub mod status;

pub use finding::{Finding, FindingSink};
pub use status::Status;
