//! Shared fixtures for rule evaluation tests.

use elbv2_audit::SnapshotCache;
use serde_json::{json, Value};

pub const REGION: &str = "us-east-1";
pub const LB_ARN: &str = "arn:aws:elasticloadbalancing:us-east-1:111122223333:loadbalancer/app/ak-39/97b5a03b63cb8fad";
pub const LB_DNS: &str = "ak-39-1555922310.us-east-1.elb.amazonaws.com";
pub const TG_ARN: &str = "arn:aws:elasticloadbalancing:us-east-1:111122223333:targetgroup/ak-39/63d6e6082a3f6607";

pub fn load_balancer() -> Value {
    json!({
        "LoadBalancerArn": LB_ARN,
        "DNSName": LB_DNS,
        "CanonicalHostedZoneId": "Z35SXDOTRQ7X7K",
        "CreatedTime": "2020-11-02T21:09:40.460Z",
        "LoadBalancerName": "ak-39",
        "Scheme": "internet-facing",
        "VpcId": "vpc-99de2fe4",
        "State": {"Code": "active"},
        "Type": "application",
        "SecurityGroups": ["sg-aa941691"],
        "IpAddressType": "ipv4"
    })
}

pub fn target_groups() -> Value {
    json!({
        "TargetGroups": [{
            "TargetGroupArn": TG_ARN,
            "TargetGroupName": "ak-39",
            "Protocol": "HTTP",
            "Port": 80,
            "HealthCheckEnabled": true,
            "HealthCheckPath": "/",
            "LoadBalancerArns": [LB_ARN],
            "TargetType": "instance"
        }]
    })
}

pub fn target(id: &str, state: &str) -> Value {
    json!({
        "Target": {"Id": id, "Port": 80},
        "HealthCheckPort": "80",
        "TargetHealth": {
            "State": state,
            "Reason": "Target.Timeout",
            "Description": "Request timed out"
        }
    })
}

pub fn target_health(states: &[&str]) -> Value {
    let targets: Vec<Value> = states
        .iter()
        .enumerate()
        .map(|(i, s)| target(&format!("i-{:017x}", i), s))
        .collect();
    json!({ "TargetHealthDescriptions": targets })
}

/// Snapshot with one load balancer, its target groups and their health.
///
/// `None` leaves the corresponding data value as JSON null.
pub fn create_cache(lbs: Option<Value>, groups: Option<Value>, health: Option<Value>) -> SnapshotCache {
    SnapshotCache::from_value(json!({
        "elbv2": {
            "describeLoadBalancers": {
                REGION: {"data": lbs}
            },
            "describeTargetGroups": {
                REGION: {LB_DNS: {"data": groups}}
            },
            "describeTargetHealth": {
                REGION: {TG_ARN: {"data": health}}
            }
        }
    }))
    .expect("fixture layout")
}

pub fn create_error_cache() -> SnapshotCache {
    SnapshotCache::from_value(json!({
        "elbv2": {
            "describeLoadBalancers": {
                REGION: {"err": {"message": "error describing Application/Network load balancers"}}
            },
            "describeTargetGroups": {
                REGION: {"err": {"message": "error describing Application/Network load balancer target groups"}}
            },
            "describeTargetHealth": {
                REGION: {"err": {"message": "error describing Application/Network load balancer target healths"}}
            }
        }
    }))
    .expect("fixture layout")
}

pub fn create_null_cache() -> SnapshotCache {
    SnapshotCache::from_value(json!({
        "elbv2": {
            "describeLoadBalancers": {REGION: null},
            "describeTargetGroups": {REGION: null},
            "describeTargetHealth": {REGION: null}
        }
    }))
    .expect("fixture layout")
}
