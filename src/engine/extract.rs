use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::vcf::header::{InfoCardinality, InfoDef, InfoType};
use crate::vcf::record::VariantRecord;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MetricResolution {
    Scalar(f64),
    PerAllele(Vec<f64>),
}

impl MetricResolution {
    pub fn values(&self) -> &[f64] {
        match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::PerAllele(values) => values,
        }
    }
}

impl Display for MetricResolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar(value) => write!(f, "{value}"),
            Self::PerAllele(values) => {
                let rendered = values
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "{rendered}")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionFailure {
    Missing,
    Malformed { raw: String },
    CardinalityMismatch { expected: usize, found: usize },
}

impl Display for ResolutionFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "MISSING"),
            Self::Malformed { raw } => write!(f, "MALFORMED ({raw:?})"),
            Self::CardinalityMismatch { expected, found } => write!(
                f,
                "CARDINALITY_MISMATCH (expected {expected} values, found {found})"
            ),
        }
    }
}

/// Pure resolution of one metric on one record, honoring the declared
/// cardinality and numeric type.
pub fn resolve_metric(
    record: &VariantRecord,
    def: &InfoDef,
) -> Result<MetricResolution, ResolutionFailure> {
    let Some(raw) = record.info_value(&def.id) else {
        return Err(ResolutionFailure::Missing);
    };
    if raw.is_empty() || raw == "." {
        return Err(ResolutionFailure::Missing);
    }
    match def.cardinality {
        InfoCardinality::Scalar => parse_numeric(raw, def.ty).map(MetricResolution::Scalar),
        InfoCardinality::PerAllele => {
            let pieces: Vec<&str> = raw.split(',').collect();
            if pieces.len() != record.alts.len() {
                return Err(ResolutionFailure::CardinalityMismatch {
                    expected: record.alts.len(),
                    found: pieces.len(),
                });
            }
            let mut values = Vec::with_capacity(pieces.len());
            for piece in pieces {
                values.push(parse_numeric(piece, def.ty)?);
            }
            Ok(MetricResolution::PerAllele(values))
        }
        InfoCardinality::Variable => Err(ResolutionFailure::Malformed {
            raw: raw.to_string(),
        }),
    }
}

fn parse_numeric(raw: &str, ty: InfoType) -> Result<f64, ResolutionFailure> {
    let trimmed = raw.trim();
    let parsed = match ty {
        InfoType::Integer => trimmed.parse::<i64>().ok().map(|v| v as f64),
        InfoType::Float => trimmed.parse::<f64>().ok(),
        InfoType::Flag | InfoType::Character | InfoType::String => None,
    };
    parsed.ok_or_else(|| ResolutionFailure::Malformed {
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{resolve_metric, MetricResolution, ResolutionFailure};
    use crate::vcf::header::{InfoCardinality, InfoDef, InfoType};
    use crate::vcf::record::VariantRecord;

    fn def(id: &str, cardinality: InfoCardinality, ty: InfoType) -> InfoDef {
        InfoDef {
            id: id.to_string(),
            cardinality,
            ty,
            description: String::new(),
        }
    }

    fn record(alt: &str, info: &str) -> VariantRecord {
        let line = format!("chr1\t1000\t.\tA\t{alt}\t.\t.\t{info}");
        VariantRecord::parse(&line, 1).expect("failed to parse record")
    }

    #[test]
    fn resolves_scalar_integer_and_float() {
        let rec = record("T", "DP=120;GERMQ=42.0");
        let dp = resolve_metric(&rec, &def("DP", InfoCardinality::Scalar, InfoType::Integer))
            .expect("failed to resolve DP");
        assert_eq!(dp, MetricResolution::Scalar(120.0));

        let germq = resolve_metric(
            &rec,
            &def("GERMQ", InfoCardinality::Scalar, InfoType::Float),
        )
        .expect("failed to resolve GERMQ");
        assert_eq!(germq, MetricResolution::Scalar(42.0));
    }

    #[test]
    fn resolves_per_allele_values_aligned_with_alts() {
        let rec = record("T,G", "TLOD=45.8,6.1");
        let tlod = resolve_metric(
            &rec,
            &def("TLOD", InfoCardinality::PerAllele, InfoType::Float),
        )
        .expect("failed to resolve TLOD");
        assert_eq!(tlod, MetricResolution::PerAllele(vec![45.8, 6.1]));
    }

    #[test]
    fn absent_and_dot_values_are_missing() {
        let rec = record("T", "DP=.;IN_PON");
        for id in ["DP", "TLOD", "IN_PON"] {
            let failure = resolve_metric(
                &rec,
                &def(id, InfoCardinality::Scalar, InfoType::Integer),
            )
            .expect_err("should be missing");
            assert_eq!(failure, ResolutionFailure::Missing, "for {id}");
        }
    }

    #[test]
    fn allele_count_disagreement_is_a_cardinality_mismatch() {
        let rec = record("T,G", "TLOD=45.8");
        let failure = resolve_metric(
            &rec,
            &def("TLOD", InfoCardinality::PerAllele, InfoType::Float),
        )
        .expect_err("should mismatch");
        assert_eq!(
            failure,
            ResolutionFailure::CardinalityMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn unparseable_values_are_malformed() {
        let rec = record("T", "DP=high;TLOD=20.5");
        let failure = resolve_metric(&rec, &def("DP", InfoCardinality::Scalar, InfoType::Integer))
            .expect_err("should be malformed");
        assert_eq!(
            failure,
            ResolutionFailure::Malformed {
                raw: "high".to_string()
            }
        );

        // Integer declarations do not accept fractional text.
        let failure = resolve_metric(
            &rec,
            &def("TLOD", InfoCardinality::Scalar, InfoType::Integer),
        )
        .expect_err("should be malformed");
        assert!(matches!(failure, ResolutionFailure::Malformed { .. }));
    }

    #[test]
    fn malformed_element_inside_per_allele_list() {
        let rec = record("T,G", "AF=0.15,low");
        let failure = resolve_metric(
            &rec,
            &def("AF", InfoCardinality::PerAllele, InfoType::Float),
        )
        .expect_err("should be malformed");
        assert_eq!(
            failure,
            ResolutionFailure::Malformed {
                raw: "low".to_string()
            }
        );
    }
}
