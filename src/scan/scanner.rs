//! Region fan-out.

use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::CacheReader;
use crate::config::EvaluationConfig;
use crate::observability::metrics;
use crate::rule::{Rule, RuleError, RuleOutput};
use crate::scan::report::ScanReport;

/// Evaluates one rule over many regions of a shared cache.
pub struct Scanner {
    rule: Arc<dyn Rule>,
    cache: Arc<dyn CacheReader>,
    config: EvaluationConfig,
    metrics_enabled: bool,
}

impl Scanner {
    pub fn new(rule: Arc<dyn Rule>, cache: Arc<dyn CacheReader>, config: EvaluationConfig) -> Self {
        Self {
            rule,
            cache,
            config,
            metrics_enabled: false,
        }
    }

    /// Record finding counters through the metrics facade.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    /// Evaluate every region and merge the results in input order.
    pub async fn scan(&self, regions: &[String]) -> Result<ScanReport, RuleError> {
        let scan_id = Uuid::new_v4();
        let limit = self.config.max_concurrent_regions.max(1);

        tracing::info!(
            scan_id = %scan_id,
            rule = self.rule.metadata().id,
            regions = regions.len(),
            concurrency = limit,
            "Scan starting"
        );

        let results: Vec<Result<RuleOutput, RuleError>> = stream::iter(regions.iter().cloned())
            .map(|region| self.evaluate(region))
            .buffered(limit)
            .collect()
            .await;

        let mut output = RuleOutput::default();
        for result in results {
            output.append(result?);
        }

        if self.metrics_enabled {
            for finding in &output.findings {
                metrics::record_finding(finding.status);
            }
        }

        let report = ScanReport::new(scan_id, self.rule.metadata(), regions.to_vec(), output);
        tracing::info!(
            scan_id = %scan_id,
            findings = report.findings.len(),
            fail = report.summary.fail,
            unknown = report.summary.unknown,
            "Scan complete"
        );
        Ok(report)
    }

    async fn evaluate(&self, region: String) -> Result<RuleOutput, RuleError> {
        let rule = self.rule.clone();
        let cache = self.cache.clone();
        let task_region = region.clone();

        let output = tokio::task::spawn_blocking(move || rule.evaluate_region(cache.as_ref(), &task_region))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    RuleError::Panicked { region: region.clone() }
                } else {
                    RuleError::Join(e.to_string())
                }
            })??;

        tracing::info!(region = %region, findings = output.findings.len(), "Region evaluated");
        if self.metrics_enabled {
            metrics::record_region_evaluated();
        }
        Ok(output)
    }
}
