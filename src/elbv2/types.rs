//! ELBv2 records as returned by the describe APIs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An Application or Network load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBalancer {
    pub load_balancer_arn: String,

    /// Join key into the describe-target-groups cache.
    #[serde(rename = "DNSName", default)]
    pub dns_name: Option<String>,

    #[serde(default)]
    pub load_balancer_name: Option<String>,

    /// `application`, `network` or `gateway`.
    #[serde(rename = "Type", default)]
    pub lb_type: Option<String>,

    #[serde(default)]
    pub scheme: Option<String>,

    /// Stamped by the source; not part of the provider payload.
    #[serde(skip_deserializing, default)]
    pub region: String,
}

impl LoadBalancer {
    pub fn arn(&self) -> &str {
        &self.load_balancer_arn
    }
}

/// A target group attached to one or more load balancers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetGroup {
    /// Join key into the describe-target-health cache.
    pub target_group_arn: String,

    #[serde(default)]
    pub target_group_name: Option<String>,

    #[serde(default)]
    pub load_balancer_arns: Vec<String>,
}

/// Health state reported for a single target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetHealthState {
    Healthy,
    Unhealthy,
    Draining,
    Unused,
    Initial,
    Unavailable,
    /// A state this crate does not know about.
    #[serde(other)]
    Other,
}

impl TargetHealthState {
    pub fn is_unhealthy(self) -> bool {
        self == TargetHealthState::Unhealthy
    }
}

impl fmt::Display for TargetHealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetHealthState::Healthy => "healthy",
            TargetHealthState::Unhealthy => "unhealthy",
            TargetHealthState::Draining => "draining",
            TargetHealthState::Unused => "unused",
            TargetHealthState::Initial => "initial",
            TargetHealthState::Unavailable => "unavailable",
            TargetHealthState::Other => "other",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Target {
    pub id: String,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetHealth {
    pub state: TargetHealthState,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Health of one registered target.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetHealthDescription {
    pub target: Target,
    pub target_health: TargetHealth,
}

impl TargetHealthDescription {
    pub fn target_id(&self) -> &str {
        &self.target.id
    }

    pub fn port(&self) -> Option<u16> {
        self.target.port
    }

    pub fn health_state(&self) -> TargetHealthState {
        self.target_health.state
    }
}
