use serde::{Deserialize, Serialize};

use crate::criteria::Criterion;
use crate::engine::extract::{MetricResolution, ResolutionFailure};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleOutcome {
    Satisfied,
    Breach,
    Missing,
    Malformed,
    CardinalityMismatch,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleResult {
    pub metric: String,
    pub outcome: RuleOutcome,
    pub observed: Option<MetricResolution>,
    pub reason: String,
}

impl RuleResult {
    pub fn satisfied(&self) -> bool {
        self.outcome == RuleOutcome::Satisfied
    }
}

/// A multiallelic resolution satisfies the criterion only when every
/// alternate allele's value individually satisfies the comparison.
pub fn evaluate_criterion(
    criterion: &Criterion,
    resolution: Result<MetricResolution, ResolutionFailure>,
) -> RuleResult {
    match resolution {
        Ok(resolution) => {
            let satisfied = resolution
                .values()
                .iter()
                .all(|value| criterion.op.compare(*value, criterion.threshold));
            RuleResult {
                metric: criterion.metric.clone(),
                outcome: if satisfied {
                    RuleOutcome::Satisfied
                } else {
                    RuleOutcome::Breach
                },
                reason: format!("{criterion}: observed {resolution}"),
                observed: Some(resolution),
            }
        }
        Err(failure) => RuleResult {
            metric: criterion.metric.clone(),
            outcome: match failure {
                ResolutionFailure::Missing => RuleOutcome::Missing,
                ResolutionFailure::Malformed { .. } => RuleOutcome::Malformed,
                ResolutionFailure::CardinalityMismatch { .. } => RuleOutcome::CardinalityMismatch,
            },
            observed: None,
            reason: format!("{criterion}: {failure}"),
        },
    }
}
