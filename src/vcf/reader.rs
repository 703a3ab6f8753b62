use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::vcf::header::{parse_info_line, InfoSchema, VcfHeader};
use crate::vcf::record::VariantRecord;
use crate::vcf::VcfError;

/// One-pass reader: header is consumed eagerly, records stream lazily.
#[derive(Debug)]
pub struct VcfReader<R: BufRead> {
    lines: Lines<R>,
    header: VcfHeader,
    line_number: usize,
}

impl VcfReader<BufReader<File>> {
    pub fn from_path(path: &Path) -> Result<Self, VcfError> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: BufRead> VcfReader<R> {
    pub fn new(reader: R) -> Result<Self, VcfError> {
        let mut lines = reader.lines();
        let mut meta_lines = Vec::new();
        let mut info = InfoSchema::default();
        let mut line_number = 0;
        let column_line = loop {
            let Some(line) = lines.next() else {
                return Err(VcfError::MissingColumnHeader);
            };
            let line = line?;
            line_number += 1;
            if line.starts_with("##") {
                if let Some(def) = parse_info_line(&line) {
                    info.insert(def);
                }
                meta_lines.push(line);
            } else if line.starts_with('#') {
                break line;
            } else {
                return Err(VcfError::MissingColumnHeader);
            }
        };
        Ok(Self {
            lines,
            header: VcfHeader {
                meta_lines,
                column_line,
                info,
            },
            line_number,
        })
    }

    pub fn header(&self) -> &VcfHeader {
        &self.header
    }
}

impl<R: BufRead> Iterator for VcfReader<R> {
    type Item = Result<VariantRecord, VcfError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(error) => return Some(Err(error.into())),
            };
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(VariantRecord::parse(&line, self.line_number));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::VcfReader;
    use crate::vcf::header::InfoCardinality;
    use crate::vcf::VcfError;

    const SAMPLE: &str = "\
##fileformat=VCFv4.2
##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Read depth\">
##INFO=<ID=TLOD,Number=A,Type=Float,Description=\"Tumor LOD\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
chr1\t100\t.\tC\tT\t.\t.\tDP=80;TLOD=31.5

chr2\t250\trs42\tG\tA,C\t.\t.\tDP=44;TLOD=9.0,4.2
";

    #[test]
    fn parses_header_then_streams_records() {
        let mut reader = VcfReader::new(Cursor::new(SAMPLE)).expect("failed to open reader");
        assert_eq!(reader.header().meta_lines.len(), 3);
        assert_eq!(reader.header().info.len(), 2);
        let tlod = reader.header().info.get("TLOD").expect("TLOD undeclared");
        assert_eq!(tlod.cardinality, InfoCardinality::PerAllele);

        let first = reader
            .next()
            .expect("missing first record")
            .expect("failed to parse first record");
        assert_eq!(first.coordinate(), "chr1:100");

        let second = reader
            .next()
            .expect("missing second record")
            .expect("failed to parse second record");
        assert_eq!(second.alts.len(), 2);
        assert!(reader.next().is_none());
    }

    #[test]
    fn errors_when_column_header_is_absent() {
        let err = VcfReader::new(Cursor::new("##fileformat=VCFv4.2\n")).expect_err("should fail");
        assert!(matches!(err, VcfError::MissingColumnHeader));
    }

    #[test]
    fn data_before_column_header_is_an_error() {
        let err = VcfReader::new(Cursor::new("chr1\t1\t.\tC\tT\t.\t.\tDP=1\n"))
            .expect_err("should fail");
        assert!(matches!(err, VcfError::MissingColumnHeader));
    }
}
