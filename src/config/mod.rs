//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ScanConfig (validated, immutable)
//!     → CLI flags override regions and output
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an absent config file is a valid setup
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    EvaluationConfig, LogFormat, ObservabilityConfig, OutputConfig, OutputFormat, RegionConfig,
    ScanConfig,
};
pub use validation::{validate_config, ValidationError};
