//! peakpipe - post-processing converters for peak-calling pipelines
//!
//! Four independent single-pass converters, one per subcommand:
//!
//! - GFF to BED12 (CDS records grouped by gene name)
//! - GTF to BED12 (exon/CDS records grouped by `Parent` attribute)
//! - Homer motif comparison tables across experimental conditions
//! - IGV session XML generation from a track/colour list
//!
//! # Example
//!
//! ```ignore
//! use peakpipe::formats::gtf::convert_gtf_to_bed;
//! use peakpipe::formats::annotation::ParseMode;
//!
//! let stats = convert_gtf_to_bed("annotation.gtf", "annotation.bed", ParseMode::Lenient)?;
//! eprintln!("{} transcripts written", stats.transcripts);
//! ```

pub mod core;
pub mod formats;
pub mod motifs;
pub mod session;

// Re-export commonly used types
pub use core::{AnnotationError, MotifError, PeakpipeError, Result, SessionError};
pub use formats::annotation::ParseMode;
pub use formats::bed12::{ConversionStats, SubFeature, TranscriptMap};
