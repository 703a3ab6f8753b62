use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::annotate::AnnotatedVariant;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnnotationSummary {
    pub total_annotated: usize,
    pub with_gene: usize,
    pub with_allele_frequency: usize,
    pub with_clinical_significance: usize,
    pub with_diseases: usize,
    pub gene_distribution: BTreeMap<String, usize>,
}

pub fn summarize(variants: &[AnnotatedVariant]) -> AnnotationSummary {
    let mut summary = AnnotationSummary {
        total_annotated: variants.len(),
        ..AnnotationSummary::default()
    };
    for variant in variants {
        if let Some(gene) = &variant.gene_name {
            summary.with_gene += 1;
            *summary.gene_distribution.entry(gene.clone()).or_insert(0) += 1;
        }
        if variant.allele_frequency.is_some() {
            summary.with_allele_frequency += 1;
        }
        if !variant.clinical_significance.is_empty() {
            summary.with_clinical_significance += 1;
        }
        if !variant.diseases.is_empty() {
            summary.with_diseases += 1;
        }
    }
    summary
}
