use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::annotate::report::AnnotationSummary;
use crate::annotate::AnnotatedVariant;
use crate::engine::RunStatistics;

pub fn render_statistics_table(stats: &RunStatistics) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Verdict", "Records"]);
    table.add_row(Row::from(vec![
        Cell::new("PASS").fg(Color::Green),
        Cell::new(stats.total_passed.to_string()),
    ]));
    table.add_row(Row::from(vec![
        Cell::new("REVIEW").fg(Color::Yellow),
        Cell::new(stats.total_review.to_string()),
    ]));
    table.add_row(Row::from(vec![
        Cell::new("FAIL").fg(Color::Red),
        Cell::new(stats.total_failed.to_string()),
    ]));
    table.add_row(Row::from(vec![
        Cell::new("Total"),
        Cell::new(stats.total_seen.to_string()),
    ]));

    let mut out = table.to_string();
    if !stats.failure_tally.is_empty() {
        let mut breakdown = Table::new();
        breakdown
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        breakdown.set_header(vec!["Criterion", "Failures"]);
        for (metric, count) in &stats.failure_tally {
            breakdown.add_row(vec![metric.clone(), count.to_string()]);
        }
        out.push('\n');
        out.push_str(&breakdown.to_string());
    }
    let non_passing = stats.total_failed + stats.total_review;
    if let Some((metric, count)) = stats.limiting_criterion() {
        if non_passing > 0 {
            let share = (count as f64 / non_passing as f64) * 100.0;
            out.push_str(&format!(
                "\nLimiting criterion: {metric} ({share:.0}% of non-passing records)"
            ));
        }
    }
    out
}

pub fn render_annotations_table(variants: &[AnnotatedVariant]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Variant",
        "rsID",
        "Gene",
        "AF",
        "Clinical significance",
        "Diseases",
    ]);
    for variant in variants {
        table.add_row(vec![
            format!(
                "{}:{} {}>{}",
                variant.chromosome, variant.position, variant.ref_allele, variant.alt_alleles
            ),
            variant.rs_id.clone().unwrap_or_else(|| "-".to_string()),
            variant.gene_name.clone().unwrap_or_else(|| "-".to_string()),
            variant
                .allele_frequency
                .clone()
                .unwrap_or_else(|| "-".to_string()),
            if variant.clinical_significance.is_empty() {
                "-".to_string()
            } else {
                variant.clinical_significance.join(", ")
            },
            if variant.diseases.is_empty() {
                "-".to_string()
            } else {
                variant.diseases.join("; ")
            },
        ]);
    }
    table.to_string()
}

pub fn render_summary_table(summary: &AnnotationSummary) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Measure", "Count"]);
    table.add_row(vec![
        "Variants annotated".to_string(),
        summary.total_annotated.to_string(),
    ]);
    table.add_row(vec![
        "With gene assignment".to_string(),
        summary.with_gene.to_string(),
    ]);
    table.add_row(vec![
        "With allele frequency".to_string(),
        summary.with_allele_frequency.to_string(),
    ]);
    table.add_row(vec![
        "With clinical significance".to_string(),
        summary.with_clinical_significance.to_string(),
    ]);
    table.add_row(vec![
        "With disease associations".to_string(),
        summary.with_diseases.to_string(),
    ]);
    for (gene, count) in &summary.gene_distribution {
        table.add_row(vec![format!("Gene {gene}"), count.to_string()]);
    }
    table.to_string()
}
