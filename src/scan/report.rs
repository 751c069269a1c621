//! Scan reports.

use serde::Serialize;
use std::fmt::Write;
use uuid::Uuid;

use crate::cache::SourceLog;
use crate::findings::{Finding, Status};
use crate::rule::{RuleMetadata, RuleOutput};

/// Number of findings per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub ok: usize,
    pub warn: usize,
    pub fail: usize,
    pub unknown: usize,
}

impl StatusSummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self::default();
        for f in findings {
            match f.status {
                Status::Ok => summary.ok += 1,
                Status::Warn => summary.warn += 1,
                Status::Fail => summary.fail += 1,
                Status::Unknown => summary.unknown += 1,
            }
        }
        summary
    }
}

/// Result of one scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub scan_id: Uuid,
    pub rule: &'static str,
    pub title: &'static str,
    pub regions: Vec<String>,
    pub summary: StatusSummary,
    pub findings: Vec<Finding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<SourceLog>,
}

impl ScanReport {
    pub fn new(scan_id: Uuid, metadata: &RuleMetadata, regions: Vec<String>, output: RuleOutput) -> Self {
        Self {
            scan_id,
            rule: metadata.id,
            title: metadata.title,
            regions,
            summary: StatusSummary::from_findings(&output.findings),
            findings: output.findings,
            sources: Some(output.sources),
        }
    }

    /// Drop the cache lookup log.
    pub fn without_sources(mut self) -> Self {
        self.sources = None;
        self
    }

    pub fn has_failures(&self) -> bool {
        self.summary.fail > 0
    }

    /// One line per finding: `STATUS region resource message`.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for f in &self.findings {
            let _ = writeln!(
                out,
                "{:<7} {} {} {}",
                f.status,
                f.region,
                f.resource.as_deref().unwrap_or("-"),
                f.message
            );
        }
        let _ = writeln!(
            out,
            "{} finding(s): {} ok, {} fail, {} unknown",
            self.findings.len(),
            self.summary.ok,
            self.summary.fail,
            self.summary.unknown
        );
        out
    }
}
