//! Shared GFF/GTF line parsing
//!
//! Both annotation dialects are 9-column tab-delimited with 1-based closed
//! coordinates. The dialects differ only in how the free-text attribute
//! column is encoded (`key=value` for GFF3, `key "value"` for GTF), so the
//! column-level parsing lives here and the dialect modules supply the
//! attribute extraction and grouping rules.

use crate::core::AnnotationError;
use memchr::memchr_iter;

/// How to treat structurally invalid input lines.
///
/// The pipeline historically skipped malformed lines without a word;
/// `Lenient` keeps that behavior (skips are counted in the conversion
/// statistics), `Strict` surfaces the first defect with its line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    Lenient,
    Strict,
}

/// Strand of a genomic feature. `Unknown` is the `?` token GFF3 allows
/// for features whose strand is relevant but undetermined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Plus,
    Minus,
    Unknown,
}

impl Strand {
    pub fn to_char(self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
            Strand::Unknown => '?',
        }
    }
}

/// Render an optional strand the way the input spells it (`.` when absent)
pub fn strand_char(strand: Option<Strand>) -> char {
    strand.map(Strand::to_char).unwrap_or('.')
}

/// Borrowed view over one 9-column annotation line.
///
/// Coordinates are kept as parsed (1-based, closed); `start0` performs the
/// 0-based half-open conversion at the single place records are ingested.
pub struct AnnotationRecordView<'a> {
    /// Sequence name (chromosome)
    pub seqname: &'a str,
    /// Feature type (gene, mRNA, exon, CDS, ...)
    pub feature: &'a str,
    /// Start position (1-based)
    pub start: u64,
    /// End position (1-based, inclusive)
    pub end: u64,
    /// Score field, may be "."
    pub score: &'a str,
    /// Strand, None for "."
    pub strand: Option<Strand>,
    /// Attribute column, dialect-specific encoding
    pub attributes: &'a str,
}

impl<'a> AnnotationRecordView<'a> {
    /// Parse one annotation line. `line_number` is only used for error
    /// reporting in strict mode.
    pub fn parse(line: &'a str, line_number: usize) -> Result<Self, AnnotationError> {
        let bytes = line.as_bytes();
        let mut bounds: Vec<(usize, usize)> = Vec::with_capacity(9);
        let mut field_start = 0;
        for tab in memchr_iter(b'\t', bytes) {
            bounds.push((field_start, tab));
            field_start = tab + 1;
        }
        bounds.push((field_start, bytes.len()));

        if bounds.len() < 9 {
            return Err(AnnotationError::TooFewFields {
                line: line_number,
                found: bounds.len(),
            });
        }

        let field = |idx: usize| -> &'a str {
            let (s, e) = bounds[idx];
            &line[s..e]
        };

        let start: u64 =
            field(3)
                .parse()
                .map_err(|_| AnnotationError::InvalidCoordinate {
                    line: line_number,
                    field: "start",
                    value: field(3).to_string(),
                })?;
        let end: u64 = field(4)
            .parse()
            .map_err(|_| AnnotationError::InvalidCoordinate {
                line: line_number,
                field: "end",
                value: field(4).to_string(),
            })?;
        if end < start {
            return Err(AnnotationError::InvertedInterval {
                line: line_number,
                start,
                end,
            });
        }

        let strand = match field(6) {
            "+" => Some(Strand::Plus),
            "-" => Some(Strand::Minus),
            "?" => Some(Strand::Unknown),
            "." => None,
            other => {
                return Err(AnnotationError::InvalidStrand {
                    line: line_number,
                    strand: other.to_string(),
                })
            }
        };

        Ok(Self {
            seqname: field(0),
            feature: field(2),
            start,
            end,
            score: field(5),
            strand,
            attributes: field(8),
        })
    }

    /// 0-based half-open start coordinate
    pub fn start0(&self) -> u64 {
        self.start.saturating_sub(1)
    }

    /// Score column with the "." placeholder mapped to "0"
    pub fn score_or_zero(&self) -> &'a str {
        if self.score == "." {
            "0"
        } else {
            self.score
        }
    }
}

/// Extract a `key=value` attribute from a GFF3 attribute column.
///
/// Keys are matched against whole `;`-separated entries so that e.g.
/// `pseudogene=` never satisfies a lookup for `gene`.
pub fn gff_attribute<'a>(attributes: &'a str, key: &str) -> Option<&'a str> {
    for entry in attributes.split(';') {
        let entry = entry.trim();
        if let Some(value) = entry.strip_prefix(key) {
            if let Some(value) = value.strip_prefix('=') {
                return Some(value);
            }
        }
    }
    None
}

/// Extract a `key "value"` attribute from a GTF attribute column.
pub fn gtf_attribute<'a>(attributes: &'a str, key: &str) -> Option<&'a str> {
    for entry in attributes.split(';') {
        let entry = entry.trim();
        if let Some(rest) = entry.strip_prefix(key) {
            let rest = rest.trim_start();
            if let Some(quoted) = rest.strip_prefix('"') {
                if let Some(end) = quoted.find('"') {
                    return Some(&quoted[..end]);
                }
            }
        }
    }
    None
}
