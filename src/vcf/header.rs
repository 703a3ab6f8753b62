use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InfoCardinality {
    /// One value per record (Number=0 or Number=1).
    Scalar,
    /// One value per alternate allele (Number=A).
    PerAllele,
    /// Number=R, Number=G, Number=. and fixed counts above 1; not filterable.
    Variable,
}

impl InfoCardinality {
    pub fn from_number(number: &str) -> Self {
        match number {
            "A" => Self::PerAllele,
            "0" | "1" => Self::Scalar,
            _ => Self::Variable,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InfoType {
    Integer,
    Float,
    Flag,
    Character,
    String,
}

impl InfoType {
    pub fn from_declaration(raw: &str) -> Self {
        match raw {
            "Integer" => Self::Integer,
            "Float" => Self::Float,
            "Flag" => Self::Flag,
            "Character" => Self::Character,
            _ => Self::String,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl Display for InfoType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Flag => "Flag",
            Self::Character => "Character",
            Self::String => "String",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InfoDef {
    pub id: String,
    pub cardinality: InfoCardinality,
    pub ty: InfoType,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InfoSchema {
    defs: IndexMap<String, InfoDef>,
}

impl InfoSchema {
    pub fn insert(&mut self, def: InfoDef) {
        self.defs.insert(def.id.clone(), def);
    }

    pub fn get(&self, id: &str) -> Option<&InfoDef> {
        self.defs.get(id)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VcfHeader {
    /// All `##` meta lines, verbatim, in file order.
    pub meta_lines: Vec<String>,
    /// The `#CHROM ...` column header line, verbatim.
    pub column_line: String,
    pub info: InfoSchema,
}

/// Parses one `##INFO=<ID=...,Number=...,Type=...,Description="...">` line.
/// Returns None for meta lines of any other kind.
pub fn parse_info_line(line: &str) -> Option<InfoDef> {
    let body = line.strip_prefix("##INFO=<")?.strip_suffix('>')?;
    let mut id = None;
    let mut number = None;
    let mut ty = None;
    let mut description = String::new();
    for field in split_meta_fields(body) {
        let Some((key, value)) = field.split_once('=') else {
            continue;
        };
        match key {
            "ID" => id = Some(value.to_string()),
            "Number" => number = Some(value.to_string()),
            "Type" => ty = Some(value.to_string()),
            "Description" => description = value.trim_matches('"').to_string(),
            _ => {}
        }
    }
    Some(InfoDef {
        id: id?,
        cardinality: InfoCardinality::from_number(number?.as_str()),
        ty: InfoType::from_declaration(ty?.as_str()),
        description,
    })
}

// Commas inside a quoted Description do not split fields.
fn split_meta_fields(body: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (idx, ch) in body.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    fields.push(&body[start..]);
    fields
}
