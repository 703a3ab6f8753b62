pub mod csv;
pub mod table;

use anyhow::Result;
use serde::Serialize;

pub fn render_json<T: Serialize>(value: &T) -> Result<String> {
    let rendered = serde_json::to_string_pretty(value)?;
    Ok(rendered)
}
