//! GTF to BED12 conversion
//!
//! Collects `exon` and `CDS` records (CDS carries coding genes that have no
//! exon lines), grouped by the explicit `Parent` attribute. Both the `gene`
//! and `Parent` attributes are required; the sub-feature id comes from `ID`
//! and defaults to `.`.

use crate::core::{open_line_reader, AnnotationError, LineIterator};
use crate::formats::annotation::{gtf_attribute, AnnotationRecordView, ParseMode};
use crate::formats::bed12::{ConversionStats, SubFeature, TranscriptMap};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Convert a GTF file to extended BED12, one line per `Parent` group.
pub fn convert_gtf_to_bed<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    mode: ParseMode,
) -> Result<ConversionStats, AnnotationError> {
    let reader = open_line_reader(input)?;
    let mut lines = LineIterator::new(reader);
    let mut map = TranscriptMap::new();
    let mut stats = ConversionStats::default();

    while let Some(line) = lines.next_line() {
        let (line_number, line) = line?;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        stats.lines += 1;

        match collect_record(line, line_number, &mut map) {
            Ok(true) => stats.records += 1,
            Ok(false) => {}
            Err(err) => match mode {
                ParseMode::Strict => return Err(err),
                ParseMode::Lenient => {
                    log::debug!("skipping GTF line {line_number}: {err}");
                    stats.skipped += 1;
                }
            },
        }
    }

    let mut writer = BufWriter::new(File::create(output)?);
    stats.transcripts = map.write_bed12(&mut writer, "")?;
    Ok(stats)
}

/// Parse one line and, if it is an exon or CDS record, add it to its
/// `Parent` group. Returns Ok(false) for other feature types.
fn collect_record(
    line: &str,
    line_number: usize,
    map: &mut TranscriptMap,
) -> Result<bool, AnnotationError> {
    let view = AnnotationRecordView::parse(line, line_number)?;
    if view.feature != "exon" && view.feature != "CDS" {
        return Ok(false);
    }

    let gene = gtf_attribute(view.attributes, "gene").ok_or(AnnotationError::MissingAttribute {
        line: line_number,
        attr: "gene",
    })?;
    let parent =
        gtf_attribute(view.attributes, "Parent").ok_or(AnnotationError::MissingAttribute {
            line: line_number,
            attr: "Parent",
        })?;
    let id = gtf_attribute(view.attributes, "ID").unwrap_or(".");

    map.push(
        parent,
        SubFeature {
            chrom: view.seqname.to_string(),
            start: view.start0(),
            end: view.end,
            gene: gene.to_string(),
            score: view.score_or_zero().to_string(),
            strand: view.strand,
            id: id.to_string(),
        },
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn convert(content: &str, mode: ParseMode) -> Result<(ConversionStats, String), AnnotationError> {
        let mut input = NamedTempFile::new().unwrap();
        input.write_all(content.as_bytes()).unwrap();
        input.flush().unwrap();
        let output = NamedTempFile::new().unwrap();
        let stats = convert_gtf_to_bed(input.path(), output.path(), mode)?;
        let out = std::fs::read_to_string(output.path()).unwrap();
        Ok((stats, out))
    }

    #[test]
    fn test_exons_grouped_by_parent() {
        let gtf = "\
chr1\thavana\texon\t100\t200\t.\t+\t.\tgene \"G1\"; ID \"e1\"; Parent \"tx1\"
chr1\thavana\texon\t300\t400\t.\t+\t.\tgene \"G1\"; ID \"e2\"; Parent \"tx1\"
";
        let (stats, out) = convert(gtf, ParseMode::Lenient).unwrap();
        assert_eq!(stats.records, 2);
        assert_eq!(
            out,
            "chr1\t99\t400\tG1\t0\t+\t99\t400\t0\t2\t101,101,\t0,200,\te1,e2\ttx1\n"
        );
    }

    #[test]
    fn test_cds_accepted_alongside_exons() {
        let gtf = "chr2\t.\tCDS\t10\t40\t5\t-\t0\tgene \"G2\"; Parent \"tx2\"\n";
        let (stats, out) = convert(gtf, ParseMode::Lenient).unwrap();
        assert_eq!(stats.records, 1);
        // Default ID, score passed through
        assert_eq!(out, "chr2\t9\t40\tG2\t5\t-\t9\t40\t0\t1\t31,\t0,\t.\ttx2\n");
    }

    #[test]
    fn test_missing_parent_dropped_leniently() {
        let gtf = "chr1\t.\texon\t1\t9\t.\t+\t.\tgene \"G1\"\n";
        let (stats, out) = convert(gtf, ParseMode::Lenient).unwrap();
        assert_eq!(stats.skipped, 1);
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_gene_errors_strictly() {
        let gtf = "chr1\t.\texon\t1\t9\t.\t+\t.\tParent \"tx1\"\n";
        let err = convert(gtf, ParseMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            AnnotationError::MissingAttribute { line: 1, attr: "gene" }
        ));
    }

    #[test]
    fn test_inverted_coordinates_dropped_leniently() {
        let gtf = "\
chr1\t.\texon\t200\t100\t.\t+\t.\tgene \"G\"; Parent \"t\"
chr1\t.\texon\t100\t200\t.\t+\t.\tgene \"G\"; Parent \"t\"
";
        let (stats, out) = convert(gtf, ParseMode::Lenient).unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.records, 1);
        assert_eq!(out, "chr1\t99\t200\tG\t0\t+\t99\t200\t0\t1\t101,\t0,\t.\tt\n");
    }

    #[test]
    fn test_inverted_coordinates_error_strictly() {
        let gtf = "chr1\t.\texon\t200\t100\t.\t+\t.\tgene \"G\"; Parent \"t\"\n";
        let err = convert(gtf, ParseMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            AnnotationError::InvertedInterval {
                line: 1,
                start: 200,
                end: 100
            }
        ));
    }

    #[test]
    fn test_output_sorted_by_parent_key() {
        let gtf = "\
chr1\t.\texon\t500\t600\t.\t+\t.\tgene \"B\"; Parent \"txB\"
chr1\t.\texon\t100\t200\t.\t+\t.\tgene \"A\"; Parent \"txA\"
";
        let (_, out) = convert(gtf, ParseMode::Lenient).unwrap();
        let names: Vec<&str> = out
            .lines()
            .map(|l| l.split('\t').nth(3).unwrap())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
