use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CriteriaError {
    #[error("malformed criterion for {metric}: expected <operator><number>, got {raw:?}")]
    MalformedCriterion { metric: String, raw: String },
    #[error("criteria source must be a JSON object mapping metric names to conditions")]
    NotAnObject,
    #[error("failed reading criteria file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid criteria JSON")]
    Json(#[from] serde_json::Error),
    #[error("criterion {metric} names a metric absent from the VCF INFO declarations")]
    UnknownMetric { metric: String },
    #[error("criterion {metric} targets a non-numeric INFO field ({ty})")]
    NonNumericMetric { metric: String, ty: String },
    #[error("criterion {metric} targets an INFO field without scalar or per-allele cardinality")]
    UnsupportedCardinality { metric: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Ge,
    Le,
    Eq,
    Ne,
    Gt,
    Lt,
}

impl Comparison {
    // Two-character symbols first so ">=" never parses as ">" with a dangling "=".
    pub const ALL: [Comparison; 6] = [
        Comparison::Ge,
        Comparison::Le,
        Comparison::Eq,
        Comparison::Ne,
        Comparison::Gt,
        Comparison::Lt,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }

    pub fn compare(&self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Ge => value >= threshold,
            Self::Le => value <= threshold,
            Self::Eq => value == threshold,
            Self::Ne => value != threshold,
            Self::Gt => value > threshold,
            Self::Lt => value < threshold,
        }
    }
}

impl Display for Comparison {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Error)]
#[error("unknown comparison operator: {0}")]
pub struct ComparisonParseError(pub String);

impl FromStr for Comparison {
    type Err = ComparisonParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Comparison::ALL
            .into_iter()
            .find(|op| op.symbol() == trimmed)
            .ok_or_else(|| ComparisonParseError(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Criterion {
    pub metric: String,
    pub op: Comparison,
    pub threshold: f64,
}

impl Criterion {
    /// Parses one `<operator><numeric literal>` condition, whitespace tolerated.
    pub fn parse(metric: impl Into<String>, raw: &str) -> Result<Self, CriteriaError> {
        let metric = metric.into();
        let trimmed = raw.trim();
        for op in Comparison::ALL {
            let Some(rest) = trimmed.strip_prefix(op.symbol()) else {
                continue;
            };
            let threshold = rest.trim().parse::<f64>().map_err(|_| {
                CriteriaError::MalformedCriterion {
                    metric: metric.clone(),
                    raw: raw.to_string(),
                }
            })?;
            return Ok(Self {
                metric,
                op,
                threshold,
            });
        }
        Err(CriteriaError::MalformedCriterion {
            metric,
            raw: raw.to_string(),
        })
    }
}

impl Display for Criterion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.metric, self.op, self.threshold)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CriteriaSet {
    pub source: String,
    pub loaded_at: DateTime<Utc>,
    pub criteria: Vec<Criterion>,
    pub raw_hash: String,
}

impl CriteriaSet {
    pub fn with_hash(
        source: impl Into<String>,
        raw_text: &str,
        criteria: Vec<Criterion>,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(raw_text.as_bytes());
        Self {
            source: source.into(),
            loaded_at: Utc::now(),
            criteria,
            raw_hash: format!("{:x}", hasher.finalize()),
        }
    }

    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.criteria.iter().map(|c| c.metric.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Comparison, CriteriaError, Criterion};

    #[test]
    fn parses_each_operator() {
        let cases = [
            (">=20.0", Comparison::Ge, 20.0),
            ("<=0.01", Comparison::Le, 0.01),
            ("==0.05", Comparison::Eq, 0.05),
            ("!=1", Comparison::Ne, 1.0),
            (">5", Comparison::Gt, 5.0),
            ("<50", Comparison::Lt, 50.0),
        ];
        for (raw, op, threshold) in cases {
            let criterion = Criterion::parse("DP", raw).expect("failed to parse condition");
            assert_eq!(criterion.op, op, "operator for {raw}");
            assert_eq!(criterion.threshold, threshold, "threshold for {raw}");
        }
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let criterion = Criterion::parse("TLOD", "  >=  20.0  ").expect("failed to parse");
        assert_eq!(criterion.op, Comparison::Ge);
        assert_eq!(criterion.threshold, 20.0);
    }

    #[test]
    fn rejects_malformed_conditions() {
        for raw in ["=>5", "20", ">=abc", "", ">= ", "~5"] {
            let err = Criterion::parse("GERMQ", raw).expect_err("should reject condition");
            match err {
                CriteriaError::MalformedCriterion { metric, .. } => assert_eq!(metric, "GERMQ"),
                other => panic!("unexpected error for {raw:?}: {other}"),
            }
        }
    }

    #[test]
    fn boundary_equality_follows_operator_strictness() {
        assert!(Comparison::Ge.compare(20.0, 20.0));
        assert!(Comparison::Le.compare(20.0, 20.0));
        assert!(!Comparison::Gt.compare(20.0, 20.0));
        assert!(!Comparison::Lt.compare(20.0, 20.0));
        assert!(Comparison::Eq.compare(20.0, 20.0));
        assert!(!Comparison::Ne.compare(20.0, 20.0));
    }
}
