//! Compliance rule surface.
//!
//! # Data Flow
//! ```text
//! driver (scan::Scanner or Rule::run)
//!     → for each region: Rule::evaluate_region(cache, region)
//!     → RuleOutput { findings, sources }
//!     → concatenated in region order
//! ```
//!
//! # Design Decisions
//! - Fetch failures and policy violations are findings, never errors
//! - RuleError is reserved for faults in the evaluator itself
//! - Rules hold no mutable state; evaluating twice gives the same output

pub mod unhealthy_instance;

use serde::Serialize;
use thiserror::Error;

use crate::cache::{CacheReader, SourceLog};
use crate::findings::Finding;

pub use unhealthy_instance::UnhealthyInstanceRule;

/// Faults in the evaluator itself.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A worker evaluating part of a region panicked.
    #[error("Evaluation of region {region} panicked")]
    Panicked { region: String },

    /// A region task could not be joined.
    #[error("Region task failed: {0}")]
    Join(String),
}

/// Descriptive metadata shown by the reporting layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMetadata {
    pub id: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub domain: &'static str,
    pub description: &'static str,
    pub more_info: &'static str,
    pub link: &'static str,
    pub recommended_action: &'static str,
    /// Provider calls whose cached results the rule reads.
    pub apis: &'static [&'static str],
}

/// Evaluation settings passed by the driver.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Regions to evaluate, in output order.
    pub regions: Vec<String>,
}

impl Settings {
    pub fn with_regions<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Findings plus the cache lookups that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleOutput {
    pub findings: Vec<Finding>,
    pub sources: SourceLog,
}

impl RuleOutput {
    pub fn append(&mut self, other: RuleOutput) {
        self.findings.extend(other.findings);
        self.sources.append(other.sources);
    }
}

/// A compliance rule evaluated against cached provider data.
pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;

    /// Evaluate a single region.
    fn evaluate_region(&self, cache: &dyn CacheReader, region: &str) -> Result<RuleOutput, RuleError>;

    /// Evaluate every region in `settings`, sequentially, in order.
    fn run(&self, cache: &dyn CacheReader, settings: &Settings) -> Result<RuleOutput, RuleError> {
        let mut output = RuleOutput::default();
        for region in &settings.regions {
            output.append(self.evaluate_region(cache, region)?);
        }
        Ok(output)
    }
}
