//! Cache-backed sources for the three describe operations.
//!
//! # Lookup Keys
//! ```text
//! describeLoadBalancers[region]
//!     → LoadBalancer.DNSName
//!     → describeTargetGroups[region][dns_name]
//!     → TargetGroup.TargetGroupArn
//!     → describeTargetHealth[region][target_group_arn]
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

use crate::cache::{CacheEntry, CacheReader, SourceLog};
use crate::elbv2::types::{LoadBalancer, TargetGroup, TargetHealthDescription};

pub const SERVICE: &str = "elbv2";
pub const DESCRIBE_LOAD_BALANCERS: &str = "describeLoadBalancers";
pub const DESCRIBE_TARGET_GROUPS: &str = "describeTargetGroups";
pub const DESCRIBE_TARGET_HEALTH: &str = "describeTargetHealth";

/// Which describe call could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    LoadBalancers,
    TargetGroups,
    TargetHealth,
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchKind::LoadBalancers => write!(f, "load balancers"),
            FetchKind::TargetGroups => write!(f, "target groups"),
            FetchKind::TargetHealth => write!(f, "target health"),
        }
    }
}

/// Upstream data for one level is unavailable or malformed.
///
/// `message` is the collector's error text, or empty when there was none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FetchKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Outcome of reading the region's load balancers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadBalancerLookup {
    /// The region was never collected.
    NoData,
    /// Collected, and there are no load balancers.
    Empty,
    Found(Vec<LoadBalancer>),
}

/// Outcome of reading one load balancer's target groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetGroupLookup {
    /// Collected, and nothing is attached. Non-compliant on its own.
    NoTargetGroups,
    Found(Vec<TargetGroup>),
}

/// Read the region's load balancers.
pub fn load_balancers(
    reader: &dyn CacheReader,
    region: &str,
    log: &mut SourceLog,
) -> Result<LoadBalancerLookup, FetchError> {
    const KIND: FetchKind = FetchKind::LoadBalancers;

    let items = match log.fetch(reader, SERVICE, DESCRIBE_LOAD_BALANCERS, region, None) {
        CacheEntry::Absent => return Ok(LoadBalancerLookup::NoData),
        CacheEntry::Error(message) => return Err(FetchError::new(KIND, message)),
        CacheEntry::Data(Value::Array(items)) => items,
        CacheEntry::Data(_) => return Err(FetchError::new(KIND, "")),
    };

    if items.is_empty() {
        return Ok(LoadBalancerLookup::Empty);
    }

    let mut lbs: Vec<LoadBalancer> = decode_list(items, KIND)?;
    for lb in &mut lbs {
        lb.region = region.to_string();
    }
    Ok(LoadBalancerLookup::Found(lbs))
}

/// Read the target groups attached to `lb`, keyed by its DNS name.
pub fn target_groups(
    reader: &dyn CacheReader,
    region: &str,
    lb: &LoadBalancer,
    log: &mut SourceLog,
) -> Result<TargetGroupLookup, FetchError> {
    const KIND: FetchKind = FetchKind::TargetGroups;

    let Some(dns_name) = lb.dns_name.as_deref() else {
        return Err(FetchError::new(KIND, ""));
    };

    let items = match log.fetch(reader, SERVICE, DESCRIBE_TARGET_GROUPS, region, Some(dns_name)) {
        CacheEntry::Absent => return Err(FetchError::new(KIND, "")),
        CacheEntry::Error(message) => return Err(FetchError::new(KIND, message)),
        CacheEntry::Data(data) => match list_field(data, "TargetGroups") {
            Some(items) => items,
            None => return Err(FetchError::new(KIND, "")),
        },
    };

    if items.is_empty() {
        return Ok(TargetGroupLookup::NoTargetGroups);
    }

    Ok(TargetGroupLookup::Found(decode_list(items, KIND)?))
}

/// Read the health of every target registered with `group`, keyed by its ARN.
///
/// An empty list is a valid answer here.
pub fn target_health(
    reader: &dyn CacheReader,
    region: &str,
    group: &TargetGroup,
    log: &mut SourceLog,
) -> Result<Vec<TargetHealthDescription>, FetchError> {
    const KIND: FetchKind = FetchKind::TargetHealth;

    let arn = group.target_group_arn.as_str();
    match log.fetch(reader, SERVICE, DESCRIBE_TARGET_HEALTH, region, Some(arn)) {
        CacheEntry::Absent => Err(FetchError::new(KIND, "")),
        CacheEntry::Error(message) => Err(FetchError::new(KIND, message)),
        CacheEntry::Data(data) => match list_field(data, "TargetHealthDescriptions") {
            Some(items) => decode_list(items, KIND),
            None => Err(FetchError::new(KIND, "")),
        },
    }
}

/// Pull a list out of `{field: [...]}`. A bare list is taken as the list itself.
fn list_field(data: Value, field: &str) -> Option<Vec<Value>> {
    match data {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove(field) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

fn decode_list<T: DeserializeOwned>(items: Vec<Value>, kind: FetchKind) -> Result<Vec<T>, FetchError> {
    serde_json::from_value(Value::Array(items)).map_err(|e| FetchError::new(kind, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SnapshotCache;
    use serde_json::json;

    const REGION: &str = "us-east-1";

    fn lb(dns: Option<&str>) -> LoadBalancer {
        LoadBalancer {
            load_balancer_arn: "arn:lb/app/web/1".into(),
            dns_name: dns.map(str::to_string),
            load_balancer_name: None,
            lb_type: None,
            scheme: None,
            region: REGION.into(),
        }
    }

    fn group(arn: &str) -> TargetGroup {
        TargetGroup {
            target_group_arn: arn.into(),
            target_group_name: None,
            load_balancer_arns: vec![],
        }
    }

    fn cache(operation: &str, node: Value) -> SnapshotCache {
        let cache = SnapshotCache::new();
        cache.insert_region(SERVICE, operation, REGION, node);
        cache
    }

    #[test]
    fn test_load_balancers_outcomes() {
        let mut log = SourceLog::new();

        let empty = SnapshotCache::new();
        assert_eq!(load_balancers(&empty, REGION, &mut log), Ok(LoadBalancerLookup::NoData));

        let c = cache(DESCRIBE_LOAD_BALANCERS, json!({"err": {"message": "denied"}}));
        assert_eq!(
            load_balancers(&c, REGION, &mut log),
            Err(FetchError::new(FetchKind::LoadBalancers, "denied"))
        );

        let c = cache(DESCRIBE_LOAD_BALANCERS, json!({"data": null}));
        assert_eq!(
            load_balancers(&c, REGION, &mut log),
            Err(FetchError::new(FetchKind::LoadBalancers, ""))
        );

        let c = cache(DESCRIBE_LOAD_BALANCERS, json!({"data": []}));
        assert_eq!(load_balancers(&c, REGION, &mut log), Ok(LoadBalancerLookup::Empty));

        let c = cache(
            DESCRIBE_LOAD_BALANCERS,
            json!({"data": [{"LoadBalancerArn": "arn:lb/app/web/1", "DNSName": "web.elb"}]}),
        );
        match load_balancers(&c, REGION, &mut log) {
            Ok(LoadBalancerLookup::Found(lbs)) => {
                assert_eq!(lbs.len(), 1);
                assert_eq!(lbs[0].region, REGION);
            }
            other => panic!("unexpected lookup: {:?}", other),
        }

        assert_eq!(log.len(), 5);
        assert_eq!(log.records()[0].outcome, "absent");
    }

    #[test]
    fn test_malformed_load_balancer_record() {
        let mut log = SourceLog::new();
        let c = cache(DESCRIBE_LOAD_BALANCERS, json!({"data": [{"DNSName": "web.elb"}]}));
        let err = load_balancers(&c, REGION, &mut log).unwrap_err();
        assert_eq!(err.kind, FetchKind::LoadBalancers);
        assert!(err.message.contains("LoadBalancerArn"));
    }

    #[test]
    fn test_target_groups_outcomes() {
        let mut log = SourceLog::new();
        let c = cache(
            DESCRIBE_TARGET_GROUPS,
            json!({
                "web.elb": {"data": {"TargetGroups": [{"TargetGroupArn": "arn:tg/1"}]}},
                "empty.elb": {"data": {"TargetGroups": []}},
                "bare.elb": {"data": []},
                "null.elb": {"data": null},
                "nofield.elb": {"data": {}},
                "err.elb": {"err": {"message": "throttled"}}
            }),
        );

        match target_groups(&c, REGION, &lb(Some("web.elb")), &mut log) {
            Ok(TargetGroupLookup::Found(groups)) => assert_eq!(groups[0].target_group_arn, "arn:tg/1"),
            other => panic!("unexpected lookup: {:?}", other),
        }
        assert_eq!(
            target_groups(&c, REGION, &lb(Some("empty.elb")), &mut log),
            Ok(TargetGroupLookup::NoTargetGroups)
        );
        assert_eq!(
            target_groups(&c, REGION, &lb(Some("bare.elb")), &mut log),
            Ok(TargetGroupLookup::NoTargetGroups)
        );

        let unknown = FetchError::new(FetchKind::TargetGroups, "");
        assert_eq!(target_groups(&c, REGION, &lb(Some("null.elb")), &mut log), Err(unknown.clone()));
        assert_eq!(target_groups(&c, REGION, &lb(Some("nofield.elb")), &mut log), Err(unknown.clone()));
        assert_eq!(target_groups(&c, REGION, &lb(Some("missing.elb")), &mut log), Err(unknown.clone()));
        assert_eq!(target_groups(&c, REGION, &lb(None), &mut log), Err(unknown));
        assert_eq!(
            target_groups(&c, REGION, &lb(Some("err.elb")), &mut log),
            Err(FetchError::new(FetchKind::TargetGroups, "throttled"))
        );

        // The DNS-less load balancer never reaches the cache.
        assert_eq!(log.len(), 7);
    }

    #[test]
    fn test_target_health_outcomes() {
        let mut log = SourceLog::new();
        let c = cache(
            DESCRIBE_TARGET_HEALTH,
            json!({
                "arn:tg/1": {"data": {"TargetHealthDescriptions": [
                    {"Target": {"Id": "i-1", "Port": 80}, "TargetHealth": {"State": "healthy"}}
                ]}},
                "arn:tg/2": {"data": {"TargetHealthDescriptions": []}},
                "arn:tg/3": {"err": "denied"}
            }),
        );

        assert_eq!(target_health(&c, REGION, &group("arn:tg/1"), &mut log).unwrap().len(), 1);
        assert!(target_health(&c, REGION, &group("arn:tg/2"), &mut log).unwrap().is_empty());
        assert_eq!(
            target_health(&c, REGION, &group("arn:tg/3"), &mut log),
            Err(FetchError::new(FetchKind::TargetHealth, "denied"))
        );
        assert_eq!(
            target_health(&c, REGION, &group("arn:tg/4"), &mut log),
            Err(FetchError::new(FetchKind::TargetHealth, ""))
        );
    }
}
