use anyhow::Result;
use serde_json::{Map, Value};

use crate::annotate::http::fetch_json;
use crate::annotate::{GeneInfo, VariantDetails};

/// Ensembl wants bare chromosome names; VCF inputs often carry a chr prefix.
fn normalize_chrom(chrom: &str) -> &str {
    chrom.strip_prefix("chr").unwrap_or(chrom)
}

pub async fn gene_at_position(base_url: &str, chrom: &str, pos: u64) -> Result<Option<GeneInfo>> {
    let region = normalize_chrom(chrom);
    let url = format!(
        "{base_url}/overlap/region/human/{region}:{pos}-{pos}?feature=gene;content-type=application/json"
    );
    let payload = fetch_json(&url, &[]).await?;
    Ok(first_gene(&payload))
}

pub async fn details_by_rsid(base_url: &str, rs_id: &str) -> Result<Option<VariantDetails>> {
    if !rs_id.starts_with("rs") {
        return Ok(None);
    }
    let url = format!("{base_url}/variation/human/{rs_id}?content-type=application/json");
    let payload = fetch_json(&url, &[]).await?;
    Ok(Some(details_from_variation(&payload)))
}

pub async fn details_by_position(
    base_url: &str,
    chrom: &str,
    pos: u64,
    reference: &str,
) -> Result<Option<VariantDetails>> {
    let region = normalize_chrom(chrom);
    let url =
        format!("{base_url}/variation/human/{region}:{pos}-{pos}:1?content-type=application/json");
    let payload = fetch_json(&url, &[]).await?;
    Ok(details_matching_position(&payload, pos, reference))
}

pub fn first_gene(payload: &Value) -> Option<GeneInfo> {
    let genes = payload.as_array()?;
    let gene = genes.iter().find_map(Value::as_object)?;
    Some(GeneInfo {
        gene_id: gene.get("id")?.as_str()?.to_string(),
        gene_name: string_field(gene, "external_name"),
        description: string_field(gene, "description"),
        biotype: string_field(gene, "biotype"),
    })
}

pub fn details_from_variation(payload: &Value) -> VariantDetails {
    VariantDetails {
        clinical_significance: string_list(payload, "clinical_significance"),
        minor_allele_freq: payload.get("minor_allele_freq").and_then(Value::as_f64),
    }
}

/// Positional lookups return every co-located variant; keep the one whose
/// mapping agrees on both start and reference allele.
pub fn details_matching_position(
    payload: &Value,
    pos: u64,
    reference: &str,
) -> Option<VariantDetails> {
    let variants = payload.as_array()?;
    for variant in variants {
        let Some(mappings) = variant.get("mappings").and_then(Value::as_array) else {
            continue;
        };
        let matched = mappings.iter().any(|mapping| {
            mapping.get("start").and_then(Value::as_u64) == Some(pos)
                && mapping
                    .get("allele_string")
                    .and_then(Value::as_str)
                    .and_then(|s| s.split('/').next())
                    == Some(reference)
        });
        if matched {
            return Some(details_from_variation(variant));
        }
    }
    None
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
