use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub criteria: CriteriaConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub annotation: AnnotationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriteriaConfig {
    #[serde(default = "default_criteria_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_keep_review_records")]
    pub keep_review_records: bool,
    #[serde(default = "default_review_marker")]
    pub review_marker: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationConfig {
    #[serde(default = "default_ensembl_url")]
    pub ensembl_url: String,
    #[serde(default = "default_eutils_url")]
    pub eutils_url: String,
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_max_diseases")]
    pub max_diseases: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub criteria_path: Option<String>,
    pub keep_review_records: Option<bool>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/somatic-triage/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(criteria_path) = overrides.criteria_path {
            self.criteria.path = criteria_path;
        }
        if let Some(keep_review_records) = overrides.keep_review_records {
            self.filter.keep_review_records = keep_review_records;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r#"[criteria]
path = "criteria.json"

[filter]
keep_review_records = true
review_marker = "review_pending"

[annotation]
ensembl_url = "https://rest.ensembl.org"
eutils_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils"
request_delay_ms = 500
max_diseases = 5
"#;
        template.to_string()
    }
}

impl Default for CriteriaConfig {
    fn default() -> Self {
        Self {
            path: default_criteria_path(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            keep_review_records: default_keep_review_records(),
            review_marker: default_review_marker(),
        }
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            ensembl_url: default_ensembl_url(),
            eutils_url: default_eutils_url(),
            request_delay_ms: default_request_delay_ms(),
            max_diseases: default_max_diseases(),
        }
    }
}

fn default_criteria_path() -> String {
    "criteria.json".to_string()
}

fn default_keep_review_records() -> bool {
    true
}

fn default_review_marker() -> String {
    "review_pending".to_string()
}

fn default_ensembl_url() -> String {
    "https://rest.ensembl.org".to_string()
}

fn default_eutils_url() -> String {
    "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string()
}

fn default_request_delay_ms() -> u64 {
    500
}

fn default_max_diseases() -> usize {
    5
}
