//! BED12 block layout and emission
//!
//! Both annotation dialects funnel their selected sub-features through the
//! same grouping structure: records accumulate under a parent/transcript key
//! during the input scan, then each group is finalized into one extended
//! BED12 line (12 standard columns plus sub-feature ids and the group key).

use crate::formats::annotation::{strand_char, Strand};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// One exon or CDS interval belonging to a transcript group.
///
/// Coordinates are 0-based half-open; the conversion from the 1-based input
/// happens at ingestion, never here.
#[derive(Debug, Clone)]
pub struct SubFeature {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub gene: String,
    pub score: String,
    pub strand: Option<Strand>,
    pub id: String,
}

/// Conversion statistics
#[derive(Debug, Clone, Default)]
pub struct ConversionStats {
    /// Input lines seen (comments and blanks excluded)
    pub lines: usize,
    /// Sub-features accepted into a group
    pub records: usize,
    /// Lines dropped in lenient mode
    pub skipped: usize,
    /// BED12 lines written
    pub transcripts: usize,
}

/// Sub-features grouped by parent/transcript key.
///
/// Iteration order is ascending lexicographic by key, which fixes the output
/// order independently of input order. Within a group the insertion order is
/// kept until finalization sorts by start coordinate (stable, so equal starts
/// keep their input order).
#[derive(Debug, Default)]
pub struct TranscriptMap {
    groups: BTreeMap<String, Vec<SubFeature>>,
}

impl TranscriptMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, parent_key: &str, feature: SubFeature) {
        self.groups
            .entry(parent_key.to_string())
            .or_default()
            .push(feature);
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Write one extended BED12 line per group.
    ///
    /// `key_prefix` is prepended to the group key in the final column (the
    /// GFF dialect tags its keys with `gene-`, the GTF dialect does not).
    /// Returns the number of lines written.
    pub fn write_bed12<W: Write>(&mut self, writer: &mut W, key_prefix: &str) -> io::Result<usize> {
        let mut written = 0;
        for (parent_key, features) in self.groups.iter_mut() {
            features.sort_by_key(|f| f.start);

            let tx_start = features.iter().map(|f| f.start).min().unwrap_or(0);
            let tx_end = features.iter().map(|f| f.end).max().unwrap_or(0);
            let first = &features[0];

            let mut block_sizes = String::new();
            let mut block_starts = String::new();
            for f in features.iter() {
                block_sizes.push_str(&(f.end - f.start).to_string());
                block_sizes.push(',');
                block_starts.push_str(&(f.start - tx_start).to_string());
                block_starts.push(',');
            }

            let ids: Vec<&str> = features.iter().map(|f| f.id.as_str()).collect();

            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t0\t{}\t{}\t{}\t{}\t{}{}",
                first.chrom,
                tx_start,
                tx_end,
                first.gene,
                first.score,
                strand_char(first.strand),
                tx_start,
                tx_end,
                features.len(),
                block_sizes,
                block_starts,
                ids.join(","),
                key_prefix,
                parent_key,
            )?;
            written += 1;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(start: u64, end: u64, id: &str) -> SubFeature {
        SubFeature {
            chrom: "chr1".to_string(),
            start,
            end,
            gene: "G1".to_string(),
            score: "0".to_string(),
            strand: Some(Strand::Plus),
            id: id.to_string(),
        }
    }

    fn render(map: &mut TranscriptMap, prefix: &str) -> String {
        let mut out = Vec::new();
        map.write_bed12(&mut out, prefix).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_single_block() {
        let mut map = TranscriptMap::new();
        map.push("tx1", feature(99, 200, "e1"));
        let out = render(&mut map, "");
        assert_eq!(
            out,
            "chr1\t99\t200\tG1\t0\t+\t99\t200\t0\t1\t101,\t0,\te1\ttx1\n"
        );
    }

    #[test]
    fn test_two_blocks_sorted_by_start() {
        let mut map = TranscriptMap::new();
        // Inserted out of coordinate order on purpose
        map.push("tx1", feature(299, 400, "e2"));
        map.push("tx1", feature(99, 200, "e1"));
        let out = render(&mut map, "");
        assert_eq!(
            out,
            "chr1\t99\t400\tG1\t0\t+\t99\t400\t0\t2\t101,101,\t0,200,\te1,e2\ttx1\n"
        );
    }

    #[test]
    fn test_groups_emitted_in_key_order() {
        let mut map = TranscriptMap::new();
        map.push("txB", feature(0, 10, "b"));
        map.push("txA", feature(0, 10, "a"));
        let out = render(&mut map, "");
        let keys: Vec<&str> = out
            .lines()
            .map(|l| l.rsplit('\t').next().unwrap())
            .collect();
        assert_eq!(keys, vec!["txA", "txB"]);
    }

    #[test]
    fn test_key_prefix() {
        let mut map = TranscriptMap::new();
        map.push("ftsZ", feature(10, 20, "cds-1"));
        let out = render(&mut map, "gene-");
        assert!(out.trim_end().ends_with("\tgene-ftsZ"));
    }

    #[test]
    fn test_stable_sort_for_equal_starts() {
        let mut map = TranscriptMap::new();
        map.push("tx1", feature(50, 60, "first"));
        map.push("tx1", feature(50, 80, "second"));
        let out = render(&mut map, "");
        let ids_col = out.trim_end().split('\t').nth(12).unwrap();
        assert_eq!(ids_col, "first,second");
    }
}
