pub mod evaluate;
pub mod extract;
pub mod verdict;

pub use evaluate::{evaluate_criterion, RuleOutcome, RuleResult};
pub use extract::{resolve_metric, MetricResolution, ResolutionFailure};
pub use verdict::{aggregate_record, RecordVerdict, RunStatistics, Verdict};

use tracing::warn;

use crate::criteria::CriteriaSet;
use crate::vcf::header::InfoSchema;
use crate::vcf::record::VariantRecord;

/// Applies every criterion to one record. Per-record resolution failures are
/// folded into the verdict; they never abort the stream.
pub fn evaluate_record(
    record: &VariantRecord,
    criteria: &CriteriaSet,
    schema: &InfoSchema,
) -> RecordVerdict {
    let mut results = Vec::with_capacity(criteria.criteria.len());
    for criterion in &criteria.criteria {
        let resolution = match schema.get(&criterion.metric) {
            Some(def) => extract::resolve_metric(record, def),
            None => Err(ResolutionFailure::Missing),
        };
        let result = evaluate::evaluate_criterion(criterion, resolution);
        if result.outcome == RuleOutcome::CardinalityMismatch {
            warn!("{}: {}", record.coordinate(), result.reason);
        }
        results.push(result);
    }
    verdict::aggregate_record(results)
}

#[cfg(test)]
mod tests {
    use super::{evaluate_record, RunStatistics, Verdict};
    use crate::criteria::{parse_criteria, CriteriaSet};
    use crate::vcf::header::{InfoCardinality, InfoDef, InfoSchema, InfoType};
    use crate::vcf::record::VariantRecord;

    const CRITERIA: &str = r#"{
        "TLOD": ">=20.0",
        "DP": ">=50",
        "POPAF": ">=3.0",
        "GERMQ": ">=30",
        "AF": ">=0.05",
        "CONTQ": ">=20",
        "SEQQ": ">=20",
        "MPOS": ">=10"
    }"#;

    fn tumor_criteria() -> CriteriaSet {
        parse_criteria(CRITERIA, "test").expect("failed to parse criteria")
    }

    fn tumor_schema() -> InfoSchema {
        let mut schema = InfoSchema::default();
        for (id, cardinality, ty) in [
            ("TLOD", InfoCardinality::PerAllele, InfoType::Float),
            ("DP", InfoCardinality::Scalar, InfoType::Integer),
            ("POPAF", InfoCardinality::PerAllele, InfoType::Float),
            ("GERMQ", InfoCardinality::Scalar, InfoType::Integer),
            ("AF", InfoCardinality::PerAllele, InfoType::Float),
            ("CONTQ", InfoCardinality::Scalar, InfoType::Integer),
            ("SEQQ", InfoCardinality::Scalar, InfoType::Integer),
            ("MPOS", InfoCardinality::PerAllele, InfoType::Integer),
        ] {
            schema.insert(InfoDef {
                id: id.to_string(),
                cardinality,
                ty,
                description: String::new(),
            });
        }
        schema
    }

    fn record_with_info(info: &str) -> VariantRecord {
        let line = format!("chr17\t7577120\t.\tC\tT\t.\t.\t{info}");
        VariantRecord::parse(&line, 1).expect("failed to parse record")
    }

    #[test]
    fn confident_record_passes_every_criterion() {
        let record = record_with_info(
            "TLOD=45.8;DP=120;POPAF=6.2;GERMQ=42;AF=0.15;CONTQ=35;SEQQ=38;MPOS=18",
        );
        let verdict = evaluate_record(&record, &tumor_criteria(), &tumor_schema());
        assert_eq!(verdict.status, Verdict::Pass);
        assert!(verdict.failing_criteria.is_empty());
        assert!(verdict.missing_criteria.is_empty());
    }

    #[test]
    fn weak_record_fails_with_breaches_in_declaration_order() {
        let record = record_with_info(
            "TLOD=8.2;DP=25;POPAF=1.2;GERMQ=12;AF=0.45;CONTQ=8;SEQQ=9;MPOS=3",
        );
        let verdict = evaluate_record(&record, &tumor_criteria(), &tumor_schema());
        assert_eq!(verdict.status, Verdict::Fail);
        assert_eq!(
            verdict.failing_criteria,
            vec!["TLOD", "DP", "POPAF", "GERMQ", "CONTQ", "SEQQ", "MPOS"]
        );
        assert!(verdict.missing_criteria.is_empty());
    }

    #[test]
    fn missing_annotation_flags_for_review_not_fail() {
        let record =
            record_with_info("TLOD=45.8;DP=120;POPAF=6.2;AF=0.15;CONTQ=35;SEQQ=38;MPOS=18");
        let verdict = evaluate_record(&record, &tumor_criteria(), &tumor_schema());
        assert_eq!(verdict.status, Verdict::Review);
        assert_eq!(verdict.missing_criteria, vec!["GERMQ"]);
        assert!(verdict.failing_criteria.is_empty());
    }

    #[test]
    fn multiallelic_record_needs_every_allele_to_pass() {
        let line = "chr17\t7577120\t.\tC\tT,G\t.\t.\tTLOD=45.8,6.1;DP=120;POPAF=6.2,5.8;GERMQ=42;AF=0.15,0.12;CONTQ=35;SEQQ=38;MPOS=18,14";
        let record = VariantRecord::parse(line, 1).expect("failed to parse record");
        let verdict = evaluate_record(&record, &tumor_criteria(), &tumor_schema());
        assert_eq!(verdict.status, Verdict::Fail);
        assert_eq!(verdict.failing_criteria, vec!["TLOD"]);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let record = record_with_info(
            "TLOD=8.2;DP=25;POPAF=1.2;GERMQ=12;AF=0.45;CONTQ=8;SEQQ=9;MPOS=3",
        );
        let criteria = tumor_criteria();
        let schema = tumor_schema();
        let first = evaluate_record(&record, &criteria, &schema);
        let second = evaluate_record(&record, &criteria, &schema);
        assert_eq!(first, second);
    }

    #[test]
    fn statistics_count_seen_and_passed_across_a_run() {
        let criteria = tumor_criteria();
        let schema = tumor_schema();
        let passing = record_with_info(
            "TLOD=45.8;DP=120;POPAF=6.2;GERMQ=42;AF=0.15;CONTQ=35;SEQQ=38;MPOS=18",
        );
        let failing = record_with_info(
            "TLOD=8.2;DP=25;POPAF=1.2;GERMQ=12;AF=0.45;CONTQ=8;SEQQ=9;MPOS=3",
        );

        let mut stats = RunStatistics::default();
        for _ in 0..5 {
            stats.observe(&evaluate_record(&passing, &criteria, &schema));
        }
        for _ in 0..5 {
            stats.observe(&evaluate_record(&failing, &criteria, &schema));
        }
        assert_eq!(stats.total_seen, 10);
        assert_eq!(stats.total_passed, 5);
        assert_eq!(stats.total_failed, 5);
        assert_eq!(stats.failure_tally.get("TLOD"), Some(&5));
        assert_eq!(stats.failure_tally.get("AF"), None);
    }
}
