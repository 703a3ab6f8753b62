use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::criteria::schema::{CriteriaError, CriteriaSet, Criterion};
use crate::vcf::header::{InfoCardinality, InfoSchema};

pub fn load_criteria(path: &Path) -> Result<CriteriaSet, CriteriaError> {
    let raw = fs::read_to_string(path).map_err(|source| CriteriaError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_criteria(&raw, path.display().to_string())
}

/// Keys with a leading underscore carry commentary, not rules, and are skipped.
/// Declaration order is preserved for deterministic failure reporting.
pub fn parse_criteria(raw: &str, source: impl Into<String>) -> Result<CriteriaSet, CriteriaError> {
    let value: Value = serde_json::from_str(raw)?;
    let Some(object) = value.as_object() else {
        return Err(CriteriaError::NotAnObject);
    };
    let mut criteria = Vec::with_capacity(object.len());
    for (metric, condition) in object {
        if metric.starts_with('_') {
            debug!("skipping commentary entry {metric}");
            continue;
        }
        let Some(condition) = condition.as_str() else {
            return Err(CriteriaError::MalformedCriterion {
                metric: metric.clone(),
                raw: condition.to_string(),
            });
        };
        criteria.push(Criterion::parse(metric.clone(), condition)?);
    }
    Ok(CriteriaSet::with_hash(source, raw, criteria))
}

/// Fails fast before any record is processed when a criterion cannot be
/// evaluated against the declared INFO schema.
pub fn validate_against_schema(
    set: &CriteriaSet,
    schema: &InfoSchema,
) -> Result<(), CriteriaError> {
    for criterion in &set.criteria {
        let Some(def) = schema.get(&criterion.metric) else {
            return Err(CriteriaError::UnknownMetric {
                metric: criterion.metric.clone(),
            });
        };
        if !def.ty.is_numeric() {
            return Err(CriteriaError::NonNumericMetric {
                metric: criterion.metric.clone(),
                ty: def.ty.to_string(),
            });
        }
        if def.cardinality == InfoCardinality::Variable {
            return Err(CriteriaError::UnsupportedCardinality {
                metric: criterion.metric.clone(),
            });
        }
    }
    Ok(())
}
