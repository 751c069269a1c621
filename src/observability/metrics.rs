//! Metrics collection.
//!
//! # Metrics
//! - `elbv2_audit_findings_total` (counter): findings by `status`
//! - `elbv2_audit_regions_evaluated_total` (counter): regions evaluated

use crate::findings::Status;

pub fn record_finding(status: Status) {
    ::metrics::counter!("elbv2_audit_findings_total", "status" => status.label()).increment(1);
}

pub fn record_region_evaluated() {
    ::metrics::counter!("elbv2_audit_regions_evaluated_total").increment(1);
}
