//! Track list reading and classification
//!
//! Tracks are classified into panels by basename substring and bucketed into
//! autoscale groups by sample identity, where the sample key is the basename
//! truncated at the replicate marker `_R`. Group ids are a pure function of
//! the input list: first-seen order, starting at 1.

use crate::core::SessionError;
use crate::core::{open_line_reader, LineIterator};
use std::collections::HashMap;
use std::path::Path;

/// Colour applied when the list leaves the colour column blank
pub const DEFAULT_COLOUR: &str = "0,0,178";

/// Display panel a track belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackCategory {
    /// Normalized signal and feature tracks (primary panel)
    Signal,
    /// Log2-ratio tracks
    Log2Ratio,
    /// Subtraction tracks
    Subtract,
}

impl TrackCategory {
    /// Autoscale-group offset keeping same-sample tracks in different
    /// panels out of each other's buckets
    pub fn group_offset(self) -> u32 {
        match self {
            TrackCategory::Signal => 0,
            TrackCategory::Log2Ratio => 1000,
            TrackCategory::Subtract => 2000,
        }
    }
}

/// How a file renders inside its panel, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    /// Gene-model features (.gtf, .gff): collapsed feature track
    GeneModel,
    /// Interval features (.bed, .broadpeak, .narrowpeak): squished feature track
    Intervals,
    /// Continuous signal (.bw, .bigwig, .tdf, .bedgraph): autoscaled data track
    ContinuousSignal,
    /// Alignments (.bam): accepted in the list, never rendered
    Alignment,
    /// Anything else: declared as a resource only
    Other,
}

/// One input list entry: a file path with its display colour
#[derive(Debug, Clone)]
pub struct TrackEntry {
    pub path: String,
    pub colour: String,
}

impl TrackEntry {
    /// File name component of the path
    pub fn basename(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }

    /// Panel classification by basename substring
    pub fn category(&self) -> TrackCategory {
        let basename = self.basename();
        if basename.contains(".log2ratio.") {
            TrackCategory::Log2Ratio
        } else if basename.contains(".subtract.") {
            TrackCategory::Subtract
        } else {
            TrackCategory::Signal
        }
    }

    /// Sample-group key: basename truncated at the replicate marker
    pub fn sample_key(&self) -> &str {
        let basename = self.basename();
        basename.split("_R").next().unwrap_or(basename)
    }

    /// Rendering classification by lowercased extension
    pub fn render_kind(&self) -> RenderKind {
        let extension = Path::new(&self.path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "gtf" | "gff" => RenderKind::GeneModel,
            "bed" | "broadpeak" | "narrowpeak" => RenderKind::Intervals,
            "bw" | "bigwig" | "tdf" | "bedgraph" => RenderKind::ContinuousSignal,
            "bam" => RenderKind::Alignment,
            _ => RenderKind::Other,
        }
    }
}

/// Read the `filepath<TAB>colour` list, prepending the trimmed path prefix.
///
/// Blank lines are skipped; a blank colour column falls back to
/// [`DEFAULT_COLOUR`]; a line without a tab separator is an error.
pub fn read_track_list<P: AsRef<Path>>(
    path: P,
    path_prefix: &str,
) -> Result<Vec<TrackEntry>, SessionError> {
    let reader = open_line_reader(path)?;
    let mut lines = LineIterator::new(reader);
    let prefix = path_prefix.trim();
    let mut entries = Vec::new();

    while let Some(line) = lines.next_line() {
        let (line_number, line) = line?;
        if line.trim().is_empty() {
            continue;
        }
        let Some((file, colour)) = line.split_once('\t') else {
            return Err(SessionError::InvalidListLine {
                line: line_number,
                content: line.to_string(),
            });
        };
        let colour = colour.trim();
        entries.push(TrackEntry {
            path: format!("{prefix}{file}"),
            colour: if colour.is_empty() {
                DEFAULT_COLOUR.to_string()
            } else {
                colour.to_string()
            },
        });
    }
    Ok(entries)
}

/// Assign autoscale group ids to sample keys: first-seen order over the
/// full input list, starting at 1.
pub fn sample_groups(entries: &[TrackEntry]) -> HashMap<String, u32> {
    let mut groups = HashMap::new();
    let mut next_id = 1;
    for entry in entries {
        groups.entry(entry.sample_key().to_string()).or_insert_with(|| {
            let id = next_id;
            next_id += 1;
            id
        });
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn entry(path: &str) -> TrackEntry {
        TrackEntry {
            path: path.to_string(),
            colour: DEFAULT_COLOUR.to_string(),
        }
    }

    #[test]
    fn test_category_classification() {
        assert_eq!(entry("x/a_R1.bw").category(), TrackCategory::Signal);
        assert_eq!(
            entry("x/a_R1.log2ratio.bw").category(),
            TrackCategory::Log2Ratio
        );
        assert_eq!(
            entry("x/a_R1.subtract.bw").category(),
            TrackCategory::Subtract
        );
    }

    #[test]
    fn test_sample_key_truncates_at_replicate_marker() {
        assert_eq!(entry("data/sampleA_R1.bw").sample_key(), "sampleA");
        assert_eq!(entry("data/sampleA_R2.log2ratio.bw").sample_key(), "sampleA");
        assert_eq!(entry("data/no_replicate.bw").sample_key(), "no_replicate.bw");
    }

    #[test]
    fn test_render_kind_by_extension() {
        assert_eq!(entry("a.GTF").render_kind(), RenderKind::GeneModel);
        assert_eq!(entry("a.narrowPeak").render_kind(), RenderKind::Intervals);
        assert_eq!(entry("a.bigWig").render_kind(), RenderKind::ContinuousSignal);
        assert_eq!(entry("a.bam").render_kind(), RenderKind::Alignment);
        assert_eq!(entry("a.txt").render_kind(), RenderKind::Other);
        assert_eq!(entry("noext").render_kind(), RenderKind::Other);
    }

    #[test]
    fn test_sample_groups_first_seen_order() {
        let entries = vec![
            entry("b_R1.bw"),
            entry("a_R1.bw"),
            entry("b_R2.bw"),
            entry("c_R1.subtract.bw"),
        ];
        let groups = sample_groups(&entries);
        assert_eq!(groups["b"], 1);
        assert_eq!(groups["a"], 2);
        assert_eq!(groups["c"], 3);
    }

    #[test]
    fn test_read_track_list() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "a_R1.bw\t255,0,0").unwrap();
        writeln!(f, "a_R2.bw\t").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "b_R1.bw\t0,255,0").unwrap();
        f.flush().unwrap();

        let entries = read_track_list(f.path(), " results/ ").unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].path, "results/a_R1.bw");
        assert_eq!(entries[0].colour, "255,0,0");
        assert_eq!(entries[1].colour, DEFAULT_COLOUR);
    }

    #[test]
    fn test_read_track_list_missing_tab() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "a_R1.bw\t255,0,0").unwrap();
        writeln!(f, "no-colour-column").unwrap();
        f.flush().unwrap();

        let err = read_track_list(f.path(), "").unwrap_err();
        assert!(matches!(err, SessionError::InvalidListLine { line: 2, .. }));
    }
}
