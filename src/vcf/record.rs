use indexmap::IndexMap;

use crate::vcf::VcfError;

#[derive(Debug, Clone, PartialEq)]
pub struct VariantRecord {
    pub chrom: String,
    pub pos: u64,
    pub id: Option<String>,
    pub reference: String,
    pub alts: Vec<String>,
    pub qual: String,
    pub filter: String,
    /// INFO entries in file order; `None` marks a flag entry without a value.
    pub info: IndexMap<String, Option<String>>,
    /// FORMAT and sample columns, preserved verbatim.
    pub trailing: Vec<String>,
}

impl VariantRecord {
    pub fn parse(line: &str, line_number: usize) -> Result<Self, VcfError> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 8 {
            return Err(VcfError::TruncatedRecord {
                line: line_number,
                found: fields.len(),
            });
        }
        let pos = fields[1].parse::<u64>().map_err(|_| VcfError::BadPosition {
            line: line_number,
            raw: fields[1].to_string(),
        })?;
        let id = (fields[2] != ".").then(|| fields[2].to_string());
        let alts = if fields[4] == "." {
            Vec::new()
        } else {
            fields[4].split(',').map(str::to_string).collect()
        };
        Ok(Self {
            chrom: fields[0].to_string(),
            pos,
            id,
            reference: fields[3].to_string(),
            alts,
            qual: fields[5].to_string(),
            filter: fields[6].to_string(),
            info: parse_info_field(fields[7]),
            trailing: fields[8..].iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Raw value of one INFO entry; `None` for absent keys and valueless flags.
    pub fn info_value(&self, key: &str) -> Option<&str> {
        self.info.get(key).and_then(|v| v.as_deref())
    }

    pub fn coordinate(&self) -> String {
        format!("{}:{}", self.chrom, self.pos)
    }

    pub fn to_line(&self, filter_override: Option<&str>) -> String {
        let mut fields = vec![
            self.chrom.clone(),
            self.pos.to_string(),
            self.id.clone().unwrap_or_else(|| ".".to_string()),
            self.reference.clone(),
            if self.alts.is_empty() {
                ".".to_string()
            } else {
                self.alts.join(",")
            },
            self.qual.clone(),
            filter_override.unwrap_or(&self.filter).to_string(),
            render_info_field(&self.info),
        ];
        fields.extend(self.trailing.iter().cloned());
        fields.join("\t")
    }
}

fn parse_info_field(raw: &str) -> IndexMap<String, Option<String>> {
    let mut info = IndexMap::new();
    if raw == "." {
        return info;
    }
    for item in raw.split(';') {
        if item.is_empty() {
            continue;
        }
        match item.split_once('=') {
            Some((key, value)) => info.insert(key.to_string(), Some(value.to_string())),
            None => info.insert(item.to_string(), None),
        };
    }
    info
}

fn render_info_field(info: &IndexMap<String, Option<String>>) -> String {
    if info.is_empty() {
        return ".".to_string();
    }
    info.iter()
        .map(|(key, value)| match value {
            Some(value) => format!("{key}={value}"),
            None => key.clone(),
        })
        .collect::<Vec<_>>()
        .join(";")
}
