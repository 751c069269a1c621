//! ELBv2 unhealthy instance rule.
//!
//! # States (per region)
//! ```text
//! START → load balancers fetched
//!     absent            → DONE (no findings)
//!     error/malformed   → UNKNOWN (region) → DONE
//!     empty             → OK (region)      → DONE
//!     non-empty         → per load balancer:
//!         target groups error/absent → UNKNOWN (lb)
//!         no target groups           → FAIL (lb)
//!         any target health error    → UNKNOWN (lb)
//!         otherwise                  → aggregate → OK | FAIL (lb)
//! ```
//!
//! # Design Decisions
//! - One finding per load balancer; siblings never affect each other
//! - Target health is fetched for every group before aggregating, so a
//!   missing health result is reported as UNKNOWN rather than hidden by a
//!   FAIL from another group
//! - Parallel evaluation keeps input order

use std::thread;

use crate::cache::{CacheReader, SourceLog};
use crate::elbv2::sources::{self, FetchError, LoadBalancerLookup, TargetGroupLookup};
use crate::elbv2::{aggregate, HealthVerdict, LoadBalancer};
use crate::findings::{Finding, FindingSink, Status};
use crate::rule::{Rule, RuleError, RuleMetadata, RuleOutput};

const LB_QUERY_FAILED: &str = "Unable to query for Application/Network load balancers: ";
const NO_LOAD_BALANCERS: &str = "No Application/Network load balancers present";
const TG_QUERY_FAILED: &str = "Unable to query for Application/Network load balancer target groups: ";
const NO_TARGET_GROUPS: &str = "No Application/Network load balancer target groups found";
const HEALTH_QUERY_FAILED: &str = "Unable to query for Application/Network load balancer target health: ";
const HEALTHY: &str = "Application/Network load balancer does not have any unhealthy instance associated";
const UNHEALTHY: &str = "Application/Network load balancer has an unhealthy instance associated";

static METADATA: RuleMetadata = RuleMetadata {
    id: "elbv2UnhealthyInstance",
    title: "ELBv2 Unhealthy Instance",
    category: "ELBv2",
    domain: "Availability",
    description: "Ensures that Application/Network load balancers do not have any unhealthy instances associated.",
    more_info: "Load balancers route traffic only to healthy targets. Unhealthy targets reduce capacity \
                and usually point to a failing application or a misconfigured health check.",
    link: "https://docs.aws.amazon.com/elasticloadbalancing/latest/application/target-group-health-checks.html",
    recommended_action: "Investigate and resolve the health issues of the targets attached to the load balancer.",
    apis: &[
        "ELBv2:describeLoadBalancers",
        "ELBv2:describeTargetGroups",
        "ELBv2:describeTargetHealth",
    ],
};

/// Reports load balancers with at least one unhealthy registered target.
#[derive(Debug, Clone, Default)]
pub struct UnhealthyInstanceRule {
    parallel_load_balancers: bool,
}

impl UnhealthyInstanceRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate load balancers of a region on separate threads.
    pub fn with_parallel_load_balancers(mut self, enabled: bool) -> Self {
        self.parallel_load_balancers = enabled;
        self
    }

    fn evaluate_all(
        &self,
        cache: &dyn CacheReader,
        region: &str,
        lbs: &[LoadBalancer],
    ) -> Result<Vec<(Finding, SourceLog)>, RuleError> {
        if !self.parallel_load_balancers || lbs.len() < 2 {
            return Ok(lbs
                .iter()
                .map(|lb| evaluate_load_balancer(cache, region, lb))
                .collect());
        }

        thread::scope(|scope| {
            let handles: Vec<_> = lbs
                .iter()
                .map(|lb| scope.spawn(move || evaluate_load_balancer(cache, region, lb)))
                .collect();

            handles
                .into_iter()
                .map(|h| {
                    h.join().map_err(|_| RuleError::Panicked {
                        region: region.to_string(),
                    })
                })
                .collect()
        })
    }
}

impl Rule for UnhealthyInstanceRule {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn evaluate_region(&self, cache: &dyn CacheReader, region: &str) -> Result<RuleOutput, RuleError> {
        let mut sink = FindingSink::new(region);
        let mut log = SourceLog::new();

        let lbs = match sources::load_balancers(cache, region, &mut log) {
            Ok(LoadBalancerLookup::NoData) => {
                tracing::debug!(region, "No load balancer data collected, skipping region");
                return Ok(RuleOutput {
                    findings: Vec::new(),
                    sources: log,
                });
            }
            Err(e) => {
                tracing::warn!(region, error = %e.message, "Load balancer query failed");
                sink.add(Status::Unknown, None, format!("{}{}", LB_QUERY_FAILED, e.message));
                return Ok(RuleOutput {
                    findings: sink.into_findings(),
                    sources: log,
                });
            }
            Ok(LoadBalancerLookup::Empty) => {
                sink.add(Status::Ok, None, NO_LOAD_BALANCERS);
                return Ok(RuleOutput {
                    findings: sink.into_findings(),
                    sources: log,
                });
            }
            Ok(LoadBalancerLookup::Found(lbs)) => lbs,
        };

        tracing::debug!(region, load_balancers = lbs.len(), "Evaluating load balancers");

        for (finding, lb_sources) in self.evaluate_all(cache, region, &lbs)? {
            sink.push(finding);
            log.append(lb_sources);
        }

        Ok(RuleOutput {
            findings: sink.into_findings(),
            sources: log,
        })
    }
}

/// Produce the single finding for one load balancer.
fn evaluate_load_balancer(cache: &dyn CacheReader, region: &str, lb: &LoadBalancer) -> (Finding, SourceLog) {
    let mut log = SourceLog::new();
    let (status, message) = verdict_for(cache, region, lb, &mut log);

    let finding = Finding {
        status,
        region: region.to_string(),
        resource: Some(lb.arn().to_string()),
        message,
    };
    (finding, log)
}

fn verdict_for(cache: &dyn CacheReader, region: &str, lb: &LoadBalancer, log: &mut SourceLog) -> (Status, String) {
    let groups = match sources::target_groups(cache, region, lb, log) {
        Ok(TargetGroupLookup::Found(groups)) => groups,
        Ok(TargetGroupLookup::NoTargetGroups) => {
            tracing::debug!(region, lb = %lb.arn(), "Load balancer has no target groups");
            return (Status::Fail, NO_TARGET_GROUPS.to_string());
        }
        Err(e) => return unknown(region, lb, TG_QUERY_FAILED, e),
    };

    let mut descriptions = Vec::new();
    for group in &groups {
        match sources::target_health(cache, region, group, log) {
            Ok(found) => descriptions.extend(found),
            Err(e) => return unknown(region, lb, HEALTH_QUERY_FAILED, e),
        }
    }

    match aggregate(&descriptions) {
        HealthVerdict::Healthy => {
            tracing::debug!(
                region,
                lb = %lb.arn(),
                target_groups = groups.len(),
                targets = ?crate::elbv2::aggregator::tally(&descriptions),
                "Load balancer healthy"
            );
            (Status::Ok, HEALTHY.to_string())
        }
        HealthVerdict::Unhealthy { target_id } => {
            tracing::debug!(region, lb = %lb.arn(), target = %target_id, "Unhealthy target found");
            (Status::Fail, UNHEALTHY.to_string())
        }
    }
}

fn unknown(region: &str, lb: &LoadBalancer, prefix: &str, e: FetchError) -> (Status, String) {
    tracing::warn!(region, lb = %lb.arn(), kind = %e.kind, error = %e.message, "Query failed");
    (Status::Unknown, format!("{}{}", prefix, e.message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SnapshotCache;
    use serde_json::{json, Value};

    const REGION: &str = "us-east-1";

    fn snapshot(lbs: Value, groups: Value, health: Value) -> SnapshotCache {
        let cache = SnapshotCache::new();
        cache.insert_region("elbv2", "describeLoadBalancers", REGION, lbs);
        cache.insert_region("elbv2", "describeTargetGroups", REGION, groups);
        cache.insert_region("elbv2", "describeTargetHealth", REGION, health);
        cache
    }

    fn lb(name: &str) -> Value {
        json!({"LoadBalancerArn": format!("arn:lb/app/{}", name), "DNSName": format!("{}.elb", name)})
    }

    fn target(id: &str, state: &str) -> Value {
        json!({"Target": {"Id": id, "Port": 80}, "TargetHealth": {"State": state}})
    }

    #[test]
    fn test_metadata() {
        let rule = UnhealthyInstanceRule::new();
        assert_eq!(rule.metadata().id, "elbv2UnhealthyInstance");
        assert_eq!(rule.metadata().apis.len(), 3);
    }

    #[test]
    fn test_health_fetch_error_wins_over_unhealthy_sibling_group() {
        let cache = snapshot(
            json!({"data": [lb("web")]}),
            json!({"web.elb": {"data": {"TargetGroups": [
                {"TargetGroupArn": "arn:tg/a"},
                {"TargetGroupArn": "arn:tg/b"}
            ]}}}),
            json!({
                "arn:tg/a": {"data": {"TargetHealthDescriptions": [target("i-1", "unhealthy")]}},
                "arn:tg/b": {"err": {"message": "throttled"}}
            }),
        );

        let out = UnhealthyInstanceRule::new().evaluate_region(&cache, REGION).unwrap();
        assert_eq!(out.findings.len(), 1);
        assert_eq!(out.findings[0].status, Status::Unknown);
        assert_eq!(
            out.findings[0].message,
            "Unable to query for Application/Network load balancer target health: throttled"
        );
    }

    #[test]
    fn test_unhealthy_in_second_group() {
        let cache = snapshot(
            json!({"data": [lb("web")]}),
            json!({"web.elb": {"data": {"TargetGroups": [
                {"TargetGroupArn": "arn:tg/a"},
                {"TargetGroupArn": "arn:tg/b"}
            ]}}}),
            json!({
                "arn:tg/a": {"data": {"TargetHealthDescriptions": [target("i-1", "healthy")]}},
                "arn:tg/b": {"data": {"TargetHealthDescriptions": [target("i-2", "unhealthy")]}}
            }),
        );

        let out = UnhealthyInstanceRule::new().evaluate_region(&cache, REGION).unwrap();
        assert_eq!(out.findings[0].status, Status::Fail);
        assert_eq!(out.findings[0].message, UNHEALTHY);
        // describeLoadBalancers + describeTargetGroups + two describeTargetHealth
        assert_eq!(out.sources.len(), 4);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let cache = snapshot(
            json!({"data": [lb("a"), lb("b"), lb("c"), lb("d")]}),
            json!({
                "a.elb": {"data": {"TargetGroups": [{"TargetGroupArn": "arn:tg/a"}]}},
                "b.elb": {"data": {"TargetGroups": []}},
                "c.elb": {"err": "denied"},
                "d.elb": {"data": {"TargetGroups": [{"TargetGroupArn": "arn:tg/d"}]}}
            }),
            json!({
                "arn:tg/a": {"data": {"TargetHealthDescriptions": [target("i-1", "healthy")]}},
                "arn:tg/d": {"data": {"TargetHealthDescriptions": [target("i-2", "unhealthy")]}}
            }),
        );

        let sequential = UnhealthyInstanceRule::new().evaluate_region(&cache, REGION).unwrap();
        let parallel = UnhealthyInstanceRule::new()
            .with_parallel_load_balancers(true)
            .evaluate_region(&cache, REGION)
            .unwrap();

        assert_eq!(sequential, parallel);
        let statuses: Vec<Status> = parallel.findings.iter().map(|f| f.status).collect();
        assert_eq!(statuses, vec![Status::Ok, Status::Fail, Status::Unknown, Status::Fail]);
        assert_eq!(parallel.findings[2].message, format!("{}denied", TG_QUERY_FAILED));
    }

    #[test]
    fn test_run_concatenates_regions_in_order() {
        let cache = SnapshotCache::new();
        cache.insert_region("elbv2", "describeLoadBalancers", "us-east-1", json!({"data": []}));
        cache.insert_region("elbv2", "describeLoadBalancers", "eu-west-1", json!({"err": "denied"}));

        let settings = crate::rule::Settings::with_regions(["eu-west-1", "ap-south-1", "us-east-1"]);
        let out = UnhealthyInstanceRule::new().run(&cache, &settings).unwrap();

        assert_eq!(out.findings.len(), 2);
        assert_eq!(out.findings[0].region, "eu-west-1");
        assert_eq!(out.findings[0].status, Status::Unknown);
        assert_eq!(out.findings[1].region, "us-east-1");
        assert_eq!(out.findings[1].status, Status::Ok);
        assert_eq!(out.sources.len(), 3);
    }
}
