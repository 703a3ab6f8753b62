use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::vcf::header::VcfHeader;
use crate::vcf::record::VariantRecord;
use crate::vcf::VcfError;

pub struct VcfWriter<W: Write> {
    inner: W,
}

impl VcfWriter<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self, VcfError> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> VcfWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Re-emits the stored header, injecting `##FILTER` declarations for the
    /// verdict markers ahead of the column header line.
    pub fn write_header(
        &mut self,
        header: &VcfHeader,
        filter_declarations: &[(&str, &str)],
    ) -> Result<(), VcfError> {
        for line in &header.meta_lines {
            writeln!(self.inner, "{line}")?;
        }
        for (id, description) in filter_declarations {
            writeln!(
                self.inner,
                "##FILTER=<ID={id},Description=\"{description}\">"
            )?;
        }
        writeln!(self.inner, "{}", header.column_line)?;
        Ok(())
    }

    pub fn write_record(&mut self, record: &VariantRecord, filter: &str) -> Result<(), VcfError> {
        writeln!(self.inner, "{}", record.to_line(Some(filter)))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), VcfError> {
        self.inner.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::VcfWriter;
    use crate::vcf::reader::VcfReader;

    const SAMPLE: &str = "\
##fileformat=VCFv4.2
##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Read depth\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
chr1\t100\t.\tC\tT\t.\t.\tDP=80
";

    #[test]
    fn injects_filter_declarations_and_marks_records() {
        let mut reader = VcfReader::new(Cursor::new(SAMPLE)).expect("failed to open reader");
        let mut out = Vec::new();
        let mut writer = VcfWriter::new(&mut out);
        writer
            .write_header(
                reader.header(),
                &[("review_pending", "criteria could not be evaluated")],
            )
            .expect("failed to write header");
        let record = reader
            .next()
            .expect("missing record")
            .expect("failed to parse record");
        writer
            .write_record(&record, "PASS")
            .expect("failed to write record");
        writer.flush().expect("failed to flush");

        let written = String::from_utf8(out).expect("invalid utf8");
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[2],
            "##FILTER=<ID=review_pending,Description=\"criteria could not be evaluated\">"
        );
        assert!(lines[3].starts_with("#CHROM"));
        assert_eq!(lines[4], "chr1\t100\t.\tC\tT\t.\tPASS\tDP=80");
    }
}
