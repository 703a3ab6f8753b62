use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::Value;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("somatic-triage/0.1")
        .timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .build()
        .expect("failed to build HTTP client")
});

pub async fn fetch_json(url: &str, query: &[(&str, &str)]) -> Result<Value> {
    let mut request = HTTP_CLIENT.get(url);
    if !query.is_empty() {
        request = request.query(query);
    }
    let response = request
        .send()
        .await
        .with_context(|| format!("failed GET request: {url}"))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .with_context(|| format!("failed reading response body: {url}"))?;
    if !status.is_success() {
        let preview: String = body.chars().take(160).collect();
        return Err(anyhow!("GET {url} returned {status}: {preview}"));
    }
    serde_json::from_str(&body).with_context(|| format!("invalid JSON response: {url}"))
}
