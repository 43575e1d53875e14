//! Property-based tests for BED12 block layout

use peakpipe::formats::annotation::Strand;
use peakpipe::{SubFeature, TranscriptMap};
use proptest::prelude::*;

fn feature(start: u64, len: u64, id: String) -> SubFeature {
    SubFeature {
        chrom: "chr1".to_string(),
        start,
        end: start + len,
        gene: "G".to_string(),
        score: "0".to_string(),
        strand: Some(Strand::Plus),
        id,
    }
}

fn render(blocks: &[(u64, u64)]) -> Vec<String> {
    let mut map = TranscriptMap::new();
    for (i, &(start, len)) in blocks.iter().enumerate() {
        map.push("tx", feature(start, len, format!("e{i}")));
    }
    let mut out = Vec::new();
    map.write_bed12(&mut out, "").unwrap();
    String::from_utf8(out)
        .unwrap()
        .trim_end()
        .split('\t')
        .map(str::to_string)
        .collect()
}

proptest! {
    #[test]
    fn block_lists_match_block_count(
        blocks in prop::collection::vec((0u64..100_000, 1u64..10_000), 1..12)
    ) {
        let fields = render(&blocks);
        prop_assert_eq!(fields.len(), 14);

        let count: usize = fields[9].parse().unwrap();
        prop_assert_eq!(count, blocks.len());
        prop_assert!(fields[10].ends_with(','));
        prop_assert!(fields[11].ends_with(','));
        prop_assert_eq!(fields[10].split_terminator(',').count(), count);
        prop_assert_eq!(fields[11].split_terminator(',').count(), count);
    }

    #[test]
    fn span_covers_every_block(
        blocks in prop::collection::vec((0u64..100_000, 1u64..10_000), 1..12)
    ) {
        let fields = render(&blocks);
        let tx_start: u64 = fields[1].parse().unwrap();
        let tx_end: u64 = fields[2].parse().unwrap();
        let span = tx_end - tx_start;

        let sizes: Vec<u64> = fields[10]
            .split_terminator(',')
            .map(|s| s.parse().unwrap())
            .collect();
        let offsets: Vec<u64> = fields[11]
            .split_terminator(',')
            .map(|o| o.parse().unwrap())
            .collect();

        // First block starts at the transcript start, offsets ascend with
        // the coordinate sort, and every block falls inside the span.
        prop_assert_eq!(offsets[0], 0);
        prop_assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
        for (offset, size) in offsets.iter().zip(&sizes) {
            prop_assert!(offset + size <= span);
        }
        // Some block reaches the transcript end.
        prop_assert!(offsets
            .iter()
            .zip(&sizes)
            .any(|(offset, size)| offset + size == span));
    }

    #[test]
    fn thick_bounds_equal_transcript_bounds(
        blocks in prop::collection::vec((0u64..100_000, 1u64..10_000), 1..12)
    ) {
        let fields = render(&blocks);
        prop_assert_eq!(&fields[6], &fields[1]);
        prop_assert_eq!(&fields[7], &fields[2]);
        prop_assert_eq!(&fields[8], "0");
    }

    #[test]
    fn id_column_lists_every_block_without_trailing_comma(
        blocks in prop::collection::vec((0u64..100_000, 1u64..10_000), 1..12)
    ) {
        let fields = render(&blocks);
        prop_assert!(!fields[12].ends_with(','));
        prop_assert_eq!(fields[12].split(',').count(), blocks.len());
    }
}
