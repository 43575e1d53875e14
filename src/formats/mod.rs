//! File format adapters
//!
//! Parsers and writers for the formats the converters touch:
//! GFF/GTF annotations, BED12 output, and Homer motif result files.

pub mod annotation;
pub mod bed12;
pub mod gff;
pub mod gtf;
pub mod homer;

pub use annotation::{AnnotationRecordView, ParseMode, Strand};
pub use bed12::{ConversionStats, SubFeature, TranscriptMap};
pub use gff::convert_gff_to_bed;
pub use gtf::convert_gtf_to_bed;
pub use homer::{parse_denovo_motifs, parse_known_motifs, DenovoMotif, KnownMotif};
