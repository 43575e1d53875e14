//! Shared infrastructure for the converters
//!
//! Error types and line-oriented input handling used by every subcommand.

mod error;
pub mod io;

pub use error::{
    AnnotationError, AnnotationResult, MotifError, MotifResult, PeakpipeError, Result,
    SessionError, SessionResult,
};
pub use io::{open_line_reader, LineIterator, DEFAULT_BUFFER_SIZE};
