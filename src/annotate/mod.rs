pub mod clinvar;
pub mod ensembl;
pub mod http;
pub mod report;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AnnotationConfig;
use crate::vcf::record::VariantRecord;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneInfo {
    pub gene_id: String,
    pub gene_name: Option<String>,
    pub description: Option<String>,
    pub biotype: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VariantDetails {
    pub clinical_significance: Vec<String>,
    pub minor_allele_freq: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnotatedVariant {
    pub chromosome: String,
    pub position: u64,
    pub rs_id: Option<String>,
    pub ref_allele: String,
    pub alt_alleles: String,
    pub gene_name: Option<String>,
    pub gene_id: Option<String>,
    pub gene_description: Option<String>,
    pub allele_frequency: Option<String>,
    pub clinical_significance: Vec<String>,
    pub diseases: Vec<String>,
}

#[async_trait]
pub trait Annotator: Send + Sync {
    async fn annotate(&self, record: &VariantRecord) -> Result<AnnotatedVariant>;
}

/// REST-backed annotator over Ensembl and ClinVar. One lookup failing
/// degrades that field and moves on; it never aborts the run.
pub struct RestAnnotator {
    config: AnnotationConfig,
}

impl RestAnnotator {
    pub fn new(config: AnnotationConfig) -> Self {
        Self { config }
    }

    async fn lookup_details(&self, record: &VariantRecord) -> Option<VariantDetails> {
        if let Some(rs_id) = record.id.as_deref() {
            match ensembl::details_by_rsid(&self.config.ensembl_url, rs_id).await {
                Ok(Some(details)) => return Some(details),
                Ok(None) => {}
                Err(error) => warn!("variant lookup failed for {rs_id}: {error}"),
            }
        }
        match ensembl::details_by_position(
            &self.config.ensembl_url,
            &record.chrom,
            record.pos,
            &record.reference,
        )
        .await
        {
            Ok(details) => details,
            Err(error) => {
                warn!(
                    "positional variant lookup failed for {}: {error}",
                    record.coordinate()
                );
                None
            }
        }
    }

    async fn lookup_diseases(&self, record: &VariantRecord) -> Vec<String> {
        if let Some(rs_id) = record.id.as_deref() {
            match clinvar::diseases_by_rsid(&self.config.eutils_url, rs_id, self.config.max_diseases)
                .await
            {
                Ok(diseases) if !diseases.is_empty() => return diseases,
                Ok(_) => {}
                Err(error) => warn!("disease lookup failed for {rs_id}: {error}"),
            }
        }
        match clinvar::diseases_by_position(
            &self.config.eutils_url,
            &record.chrom,
            record.pos,
            self.config.max_diseases,
        )
        .await
        {
            Ok(diseases) => diseases,
            Err(error) => {
                warn!(
                    "positional disease lookup failed for {}: {error}",
                    record.coordinate()
                );
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl Annotator for RestAnnotator {
    async fn annotate(&self, record: &VariantRecord) -> Result<AnnotatedVariant> {
        let gene = match ensembl::gene_at_position(
            &self.config.ensembl_url,
            &record.chrom,
            record.pos,
        )
        .await
        {
            Ok(gene) => gene,
            Err(error) => {
                warn!("gene lookup failed for {}: {error}", record.coordinate());
                None
            }
        };
        let details = self.lookup_details(record).await;
        let diseases = self.lookup_diseases(record).await;

        let allele_frequency = allele_frequency_from_info(record).or_else(|| {
            details
                .as_ref()
                .and_then(|d| d.minor_allele_freq)
                .map(|maf| format!("{maf:.6}"))
        });

        Ok(AnnotatedVariant {
            chromosome: record.chrom.clone(),
            position: record.pos,
            rs_id: record.id.clone(),
            ref_allele: record.reference.clone(),
            alt_alleles: record.alts.join(","),
            gene_name: gene.as_ref().and_then(|g| g.gene_name.clone()),
            gene_id: gene.as_ref().map(|g| g.gene_id.clone()),
            gene_description: gene.as_ref().and_then(|g| g.description.clone()),
            allele_frequency,
            clinical_significance: details
                .map(|d| d.clinical_significance)
                .unwrap_or_default(),
            diseases,
        })
    }
}

const AF_KEYS: [&str; 7] = [
    "AF",
    "MAF",
    "CAF",
    "GMAF",
    "ExAC_AF",
    "gnomAD_AF",
    "1000Gp3_AF",
];

/// First parseable allele frequency from INFO, preferring the common keys in
/// order; comma-separated lists contribute their first value.
pub fn allele_frequency_from_info(record: &VariantRecord) -> Option<String> {
    for key in AF_KEYS {
        let Some(raw) = record.info_value(key) else {
            continue;
        };
        let first = raw.split(',').next().unwrap_or(raw);
        if let Ok(value) = first.trim().parse::<f64>() {
            return Some(format!("{value:.6}"));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::allele_frequency_from_info;
    use crate::vcf::record::VariantRecord;

    fn record(info: &str) -> VariantRecord {
        let line = format!("chr17\t7577120\trs28934578\tC\tT\t.\tPASS\t{info}");
        VariantRecord::parse(&line, 1).expect("failed to parse record")
    }

    #[test]
    fn prefers_af_over_fallback_keys() {
        let rec = record("gnomAD_AF=0.002;AF=0.15");
        assert_eq!(allele_frequency_from_info(&rec).as_deref(), Some("0.150000"));
    }

    #[test]
    fn falls_through_unparseable_keys_and_splits_lists() {
        let rec = record("AF=notanumber;CAF=0.9985,0.0015");
        assert_eq!(allele_frequency_from_info(&rec).as_deref(), Some("0.998500"));
    }

    #[test]
    fn absent_frequency_yields_none() {
        assert!(allele_frequency_from_info(&record("DP=100")).is_none());
    }
}
