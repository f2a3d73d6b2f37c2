use crate::core::error::ReportError;
use crate::core::io;
use crate::core::model::CategoryCount;
use std::path::Path;

pub const MIN_GFF_FIELDS: usize = 9;
const TYPE_COLUMN: usize = 2;

/// Counts the feature types (column 3) of a GFF/GTF-like file.
pub fn count_feature_types(path: &Path) -> Result<CategoryCount, ReportError> {
    let text = io::read_text(path)?;
    count_feature_types_text(&text)
}

pub fn count_feature_types_text(text: &str) -> Result<CategoryCount, ReportError> {
    let mut counts = CategoryCount::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < MIN_GFF_FIELDS {
            return Err(ReportError::MalformedAnnotationLine {
                line: i + 1,
                fields: fields.len(),
            });
        }
        counts.increment(fields[TYPE_COLUMN]);
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GFF: &str = "##gff-version 3
chr1\tsrc\tgene\t1\t100\t.\t+\t.\tID=g1
chr1\tsrc\tmRNA\t1\t100\t.\t+\t.\tID=t1;Parent=g1

chr1\tsrc\texon\t1\t50\t.\t+\t.\tParent=t1
chr1\tsrc\texon\t60\t100\t.\t+\t.\tParent=t1
# trailing comment
chr2\tsrc\tgene\t5\t80\t.\t-\t.\tID=g2
";

    #[test]
    fn counts_column_three() {
        let counts = count_feature_types_text(GFF).unwrap();
        let got: Vec<_> = counts.iter().collect();
        assert_eq!(got, vec![("gene", 2), ("mRNA", 1), ("exon", 2)]);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn short_line_reports_line_number() {
        let text = "# header\nchr1\tsrc\tgene\t1\t100\t.\t+\t.\tID=g1\n\nchr1\tsrc\texon\t1\n";
        match count_feature_types_text(text) {
            Err(ReportError::MalformedAnnotationLine { line, fields }) => {
                assert_eq!(line, 4);
                assert_eq!(fields, 4);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn comments_only_is_empty() {
        let counts = count_feature_types_text("# a\n\n   \n#b\n").unwrap();
        assert!(counts.is_empty());
    }

    #[test]
    fn crlf_lines_are_accepted() {
        let text = "chr1\tsrc\tCDS\t1\t9\t.\t+\t0\tID=c1\r\n";
        let counts = count_feature_types_text(text).unwrap();
        assert_eq!(counts.get("CDS"), Some(1));
    }

    #[test]
    fn reading_twice_gives_same_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.gff3");
        std::fs::write(&path, GFF).unwrap();
        let a = count_feature_types(&path).unwrap();
        let b = count_feature_types(&path).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn gzip_annotation_counts_like_plain() {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("a.gff3");
        std::fs::write(&plain, GFF).unwrap();

        let packed = dir.path().join("a.gff3.gz");
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(GFF.as_bytes()).unwrap();
        std::fs::write(&packed, enc.finish().unwrap()).unwrap();

        let expected = count_feature_types(&plain).unwrap();
        assert_eq!(count_feature_types(&packed).unwrap(), expected);
        assert_eq!(expected.total(), 5);
    }
}
