//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate region names and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ScanConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use thiserror::Error;

use crate::config::schema::ScanConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no regions configured")]
    NoRegions,

    #[error("invalid region name '{0}'")]
    InvalidRegion(String),

    #[error("region '{0}' listed more than once")]
    DuplicateRegion(String),

    #[error("max_concurrent_regions must be greater than 0")]
    ZeroConcurrency,

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ScanConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = validate_regions(&config.regions.regions);

    if config.evaluation.max_concurrent_regions == 0 {
        errors.push(ValidationError::ZeroConcurrency);
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Region list checks, shared with CLI overrides.
pub fn validate_regions(regions: &[String]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if regions.is_empty() {
        errors.push(ValidationError::NoRegions);
    }

    let mut seen = HashSet::new();
    for region in regions {
        if !is_region_name(region) {
            errors.push(ValidationError::InvalidRegion(region.clone()));
        }
        if !seen.insert(region.as_str()) {
            errors.push(ValidationError::DuplicateRegion(region.clone()));
        }
    }
    errors
}

/// `us-east-1`, `us-gov-west-1`, `cn-north-1`.
fn is_region_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    !bytes.is_empty()
        && bytes[0].is_ascii_lowercase()
        && bytes[bytes.len() - 1].is_ascii_digit()
        && name.contains('-')
        && !name.contains("--")
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
}
