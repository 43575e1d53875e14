//! Error types for peakpipe
//!
//! Defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for peakpipe operations
#[derive(Debug, Error)]
pub enum PeakpipeError {
    /// Annotation conversion errors
    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    /// Motif table errors
    #[error("Motif error: {0}")]
    Motif(#[from] MotifError),

    /// IGV session errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while converting GFF/GTF annotations to BED12.
///
/// The line-numbered variants are only surfaced in strict parse mode; in
/// lenient mode the offending line is skipped and counted instead.
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// Fewer than nine tab-separated fields
    #[error("Too few fields at line {line}: expected 9, found {found}")]
    TooFewFields { line: usize, found: usize },

    /// Failed to parse a coordinate field
    #[error("Invalid {field} coordinate '{value}' at line {line}")]
    InvalidCoordinate {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// End coordinate precedes the start coordinate
    #[error("Inverted interval {start}..{end} at line {line}")]
    InvertedInterval { line: usize, start: u64, end: u64 },

    /// Strand column holds an unrecognized token
    #[error("Invalid strand '{strand}' at line {line}")]
    InvalidStrand { line: usize, strand: String },

    /// A required attribute key is absent
    #[error("Missing '{attr}' attribute at line {line}")]
    MissingAttribute { line: usize, attr: &'static str },

    /// I/O error during conversion
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while building motif comparison tables
#[derive(Debug, Error)]
pub enum MotifError {
    /// The results root passed on the command line does not exist
    #[error("Directory not found: {0}")]
    RootNotFound(PathBuf),

    /// I/O error during discovery or table writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while generating an IGV session
#[derive(Debug, Error)]
pub enum SessionError {
    /// A track list line without a tab separator
    #[error("Invalid track list line {line}: expected 'path<TAB>colour', got '{content}'")]
    InvalidListLine { line: usize, content: String },

    /// Serialized session is not valid UTF-8 (should never happen)
    #[error("Session document is not valid UTF-8")]
    InvalidUtf8,

    /// XML serialization error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error while reading the list or writing the session
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for peakpipe operations
pub type Result<T> = std::result::Result<T, PeakpipeError>;

/// Result type alias for annotation conversion
pub type AnnotationResult<T> = std::result::Result<T, AnnotationError>;

/// Result type alias for motif table operations
pub type MotifResult<T> = std::result::Result<T, MotifError>;

/// Result type alias for session generation
pub type SessionResult<T> = std::result::Result<T, SessionError>;
