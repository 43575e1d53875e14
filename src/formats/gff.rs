//! GFF3 to BED12 conversion
//!
//! Collects `CDS` records, grouped by their `gene` attribute, and emits one
//! BED12 line per gene. The group key lands in the final output column with
//! a `gene-` tag.

use crate::core::{open_line_reader, AnnotationError, LineIterator};
use crate::formats::annotation::{gff_attribute, AnnotationRecordView, ParseMode};
use crate::formats::bed12::{ConversionStats, SubFeature, TranscriptMap};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const GROUP_KEY_PREFIX: &str = "gene-";

/// Convert a GFF3 file to extended BED12.
///
/// Comment and blank lines are ignored. In lenient mode malformed lines and
/// CDS records without a `gene` attribute are dropped and counted; in strict
/// mode the first defect is returned with its line number.
pub fn convert_gff_to_bed<P: AsRef<Path>, Q: AsRef<Path>>(
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
                    log::debug!("skipping GFF line {line_number}: {err}");
                    stats.skipped += 1;
                }
            },
        }
    }

    let mut writer = BufWriter::new(File::create(output)?);
    stats.transcripts = map.write_bed12(&mut writer, GROUP_KEY_PREFIX)?;
    Ok(stats)
}

/// Parse one line and, if it is a CDS record, add it to its gene group.
/// Returns Ok(false) for well-formed lines of other feature types.
fn collect_record(
    line: &str,
    line_number: usize,
    map: &mut TranscriptMap,
) -> Result<bool, AnnotationError> {
    let view = AnnotationRecordView::parse(line, line_number)?;
    if view.feature != "CDS" {
        return Ok(false);
    }

    let gene = gff_attribute(view.attributes, "gene").ok_or(AnnotationError::MissingAttribute {
        line: line_number,
        attr: "gene",
    })?;
    let id = gff_attribute(view.attributes, "ID")
        .map(str::to_string)
        .unwrap_or_else(|| format!("cds-{gene}"));

    map.push(
        gene,
        SubFeature {
            chrom: view.seqname.to_string(),
            start: view.start0(),
            end: view.end,
            gene: gene.to_string(),
            score: view.score_or_zero().to_string(),
            strand: view.strand,
            id,
        },
    );
    Ok(true)
}
