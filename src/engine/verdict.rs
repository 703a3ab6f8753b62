use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::engine::evaluate::{RuleOutcome, RuleResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
    Review,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordVerdict {
    pub status: Verdict,
    /// Metrics breached or shape-mismatched, in rule-declaration order.
    pub failing_criteria: Vec<String>,
    /// Metrics unresolvable on this record (absent or unparseable), in
    /// rule-declaration order.
    pub missing_criteria: Vec<String>,
    pub results: Vec<RuleResult>,
}

/// A record below evaluable (missing/unparseable annotation) is routed to
/// review rather than counted as a threshold failure.
pub fn aggregate_record(results: Vec<RuleResult>) -> RecordVerdict {
    let mut failing = Vec::new();
    let mut missing = Vec::new();
    for result in &results {
        match result.outcome {
            RuleOutcome::Satisfied => {}
            RuleOutcome::Breach | RuleOutcome::CardinalityMismatch => {
                failing.push(result.metric.clone());
            }
            RuleOutcome::Missing | RuleOutcome::Malformed => {
                missing.push(result.metric.clone());
            }
        }
    }
    let status = if failing.is_empty() && missing.is_empty() {
        Verdict::Pass
    } else if !missing.is_empty() {
        Verdict::Review
    } else {
        Verdict::Fail
    };
    RecordVerdict {
        status,
        failing_criteria: failing,
        missing_criteria: missing,
        results,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunStatistics {
    pub total_seen: u64,
    pub total_passed: u64,
    pub total_review: u64,
    pub total_failed: u64,
    /// Failure counts per criterion, in rule-declaration encounter order.
    pub failure_tally: IndexMap<String, u64>,
}

impl RunStatistics {
    pub fn observe(&mut self, verdict: &RecordVerdict) {
        self.total_seen += 1;
        match verdict.status {
            Verdict::Pass => self.total_passed += 1,
            Verdict::Review => self.total_review += 1,
            Verdict::Fail => self.total_failed += 1,
        }
        for metric in &verdict.failing_criteria {
            *self.failure_tally.entry(metric.clone()).or_insert(0) += 1;
        }
    }

    /// The criterion that failed most often; first-encountered wins ties.
    pub fn limiting_criterion(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (metric, count) in &self.failure_tally {
            if best.map_or(true, |(_, max)| *count > max) {
                best = Some((metric.as_str(), *count));
            }
        }
        best
    }
}
