pub mod header;
pub mod reader;
pub mod record;
pub mod writer;

use thiserror::Error;

pub use header::{InfoCardinality, InfoDef, InfoSchema, InfoType, VcfHeader};
pub use reader::VcfReader;
pub use record::VariantRecord;
pub use writer::VcfWriter;

#[derive(Debug, Error)]
pub enum VcfError {
    #[error("line {line}: expected at least 8 tab-separated columns, found {found}")]
    TruncatedRecord { line: usize, found: usize },
    #[error("line {line}: unparseable position {raw:?}")]
    BadPosition { line: usize, raw: String },
    #[error("input ends before the #CHROM column header line")]
    MissingColumnHeader,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
