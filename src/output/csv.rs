use anyhow::Result;

use crate::annotate::AnnotatedVariant;
use crate::engine::RunStatistics;

pub fn annotations_to_csv(variants: &[AnnotatedVariant]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "chromosome",
        "position",
        "rs_id",
        "ref_allele",
        "alt_alleles",
        "gene_name",
        "gene_id",
        "gene_description",
        "allele_frequency",
        "clinical_significance",
        "associated_diseases",
    ])?;
    for variant in variants {
        writer.write_record([
            variant.chromosome.clone(),
            variant.position.to_string(),
            variant.rs_id.clone().unwrap_or_else(|| "N/A".to_string()),
            variant.ref_allele.clone(),
            variant.alt_alleles.clone(),
            variant
                .gene_name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            variant
                .gene_id
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            variant
                .gene_description
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            variant
                .allele_frequency
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            if variant.clinical_significance.is_empty() {
                "Unknown".to_string()
            } else {
                variant.clinical_significance.join(", ")
            },
            if variant.diseases.is_empty() {
                "No disease associations found".to_string()
            } else {
                variant.diseases.join("; ")
            },
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn statistics_to_csv(stats: &RunStatistics) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["measure", "count"])?;
    let totals = [
        ("total_seen", stats.total_seen),
        ("total_passed", stats.total_passed),
        ("total_review", stats.total_review),
        ("total_failed", stats.total_failed),
    ];
    for (measure, count) in totals {
        writer.write_record([measure.to_string(), count.to_string()])?;
    }
    for (metric, count) in &stats.failure_tally {
        writer.write_record([format!("failed[{metric}]"), count.to_string()])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
