use anyhow::Result;
use serde_json::Value;

use crate::annotate::http::fetch_json;

pub async fn diseases_by_rsid(base_url: &str, rs_id: &str, max: usize) -> Result<Vec<String>> {
    if !rs_id.starts_with("rs") {
        return Ok(Vec::new());
    }
    search_and_summarize(base_url, rs_id, max).await
}

pub async fn diseases_by_position(
    base_url: &str,
    chrom: &str,
    pos: u64,
    max: usize,
) -> Result<Vec<String>> {
    let chrom = chrom.strip_prefix("chr").unwrap_or(chrom);
    let term = format!("{chrom}[chr] AND {pos}[chrpos37]");
    search_and_summarize(base_url, &term, max).await
}

async fn search_and_summarize(base_url: &str, term: &str, max: usize) -> Result<Vec<String>> {
    let retmax = max.to_string();
    let search = fetch_json(
        &format!("{base_url}/esearch.fcgi"),
        &[
            ("db", "clinvar"),
            ("term", term),
            ("retmode", "json"),
            ("retmax", retmax.as_str()),
        ],
    )
    .await?;
    let ids = search_ids(&search);
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let joined = ids[..ids.len().min(max)].join(",");
    let summary = fetch_json(
        &format!("{base_url}/esummary.fcgi"),
        &[("db", "clinvar"), ("id", joined.as_str()), ("retmode", "json")],
    )
    .await?;
    Ok(disease_titles(&summary, &ids, max))
}

pub fn search_ids(payload: &Value) -> Vec<String> {
    payload
        .get("esearchresult")
        .and_then(|result| result.get("idlist"))
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn disease_titles(payload: &Value, ids: &[String], max: usize) -> Vec<String> {
    let Some(result) = payload.get("result") else {
        return Vec::new();
    };
    let mut titles = Vec::new();
    for uid in ids.iter().take(max) {
        let title = result
            .get(uid.as_str())
            .and_then(|entry| entry.get("title"))
            .and_then(Value::as_str);
        if let Some(title) = title {
            if !title.is_empty() {
                titles.push(title.to_string());
            }
        }
    }
    titles
}
