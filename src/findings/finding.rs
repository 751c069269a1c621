//! Finding records and the per-evaluation output sequence.

use serde::{Deserialize, Serialize};

use crate::findings::Status;

/// A single compliance result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub status: Status,
    pub region: String,
    /// Resource identifier, or `None` for region-level summaries.
    pub resource: Option<String>,
    pub message: String,
}

/// Builds findings for one region and collects them in order.
#[derive(Debug)]
pub struct FindingSink {
    region: String,
    findings: Vec<Finding>,
}

impl FindingSink {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            findings: Vec::new(),
        }
    }

    /// Append a finding scoped to this sink's region.
    pub fn add(&mut self, status: Status, resource: Option<&str>, message: impl Into<String>) {
        self.findings.push(Finding {
            status,
            region: self.region.clone(),
            resource: resource.map(str::to_string),
            message: message.into(),
        });
    }

    /// Append an already-built finding. Its region must match the sink's.
    pub fn push(&mut self, finding: Finding) {
        debug_assert_eq!(finding.region, self.region);
        self.findings.push(finding);
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}
