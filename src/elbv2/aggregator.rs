//! Reduce target health across a load balancer's target groups.
//!
//! A single unhealthy target anywhere under the load balancer fails it.
//! There is no threshold or percentage logic, and order never matters.

use std::collections::BTreeMap;

use crate::elbv2::types::TargetHealthDescription;

/// Health verdict for one load balancer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthVerdict {
    /// No registered target is unhealthy.
    Healthy,
    /// The first unhealthy target found.
    Unhealthy { target_id: String },
}

impl HealthVerdict {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthVerdict::Healthy)
    }
}

/// Decide the verdict over every target of every target group.
///
/// Stops at the first unhealthy target.
pub fn aggregate<'a, I>(descriptions: I) -> HealthVerdict
where
    I: IntoIterator<Item = &'a TargetHealthDescription>,
{
    descriptions
        .into_iter()
        .find(|d| d.health_state().is_unhealthy())
        .map(|d| HealthVerdict::Unhealthy {
            target_id: d.target_id().to_string(),
        })
        .unwrap_or(HealthVerdict::Healthy)
}

/// Count of targets per health state, for logging.
pub fn tally<'a, I>(descriptions: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a TargetHealthDescription>,
{
    let mut counts = BTreeMap::new();
    for d in descriptions {
        *counts.entry(d.health_state().to_string()).or_insert(0) += 1;
    }
    counts
}
