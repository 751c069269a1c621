//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! scan driver / rule evaluation produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (finding and region counters)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing, pretty for terminals
//! - Counters go through the `metrics` facade; the embedding process
//!   decides whether an exporter is installed

pub mod logging;
pub mod metrics;
