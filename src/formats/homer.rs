//! Homer motif result parsers
//!
//! Two Homer output flavors feed the comparison tables:
//!
//! - `knownResults.txt`: tab-delimited table of database motifs, one header
//!   line, percent-of-targets in the seventh column as `"X.XX%"`.
//! - `homerMotifs.all.motifs`: de novo motif file whose `>` header lines
//!   carry a `T:count(percent%)` token and optionally a `P:` p-value; the
//!   rendered logo for motif N lives at `homerResults/motifN.logo.svg` next
//!   to the file.

use crate::core::{open_line_reader, LineIterator};
use std::io;
use std::path::{Path, PathBuf};

/// One database motif hit in a single condition
#[derive(Debug, Clone, PartialEq)]
pub struct KnownMotif {
    /// Base motif name: text preceding the first parenthesis of the
    /// compound Homer name field
    pub name: String,
    /// Consensus sequence
    pub consensus: String,
    /// Enrichment p-value, kept as the raw string
    pub pvalue: String,
    /// Percent of target sequences containing the motif
    pub percent_target: f64,
}

/// One de novo motif in a single condition
#[derive(Debug, Clone, PartialEq)]
pub struct DenovoMotif {
    /// Consensus sequence (the de novo identity key)
    pub consensus: String,
    /// Enrichment p-value when the header carries one
    pub pvalue: Option<String>,
    /// Percent of target sequences containing the motif
    pub percent_target: f64,
    /// Rendered logo image, only recorded when present on disk
    pub logo: Option<PathBuf>,
}

/// Parse a Homer `knownResults.txt` file.
///
/// The first line is a header. Blank lines, rows with fewer than seven
/// fields, and rows whose percent column does not parse are skipped.
pub fn parse_known_motifs<P: AsRef<Path>>(path: P) -> io::Result<Vec<KnownMotif>> {
    let reader = open_line_reader(path)?;
    let mut lines = LineIterator::new(reader);
    let mut motifs = Vec::new();

    while let Some(line) = lines.next_line() {
        let (line_number, line) = line?;
        if line_number == 1 || line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 7 {
            continue;
        }

        let name = fields[0].split('(').next().unwrap_or(fields[0]);
        let percent_target = match fields[6].trim_end_matches('%').parse::<f64>() {
            Ok(p) => p,
            Err(_) => {
                log::debug!("unparsable percent column at line {line_number}");
                continue;
            }
        };

        motifs.push(KnownMotif {
            name: name.to_string(),
            consensus: fields[1].to_string(),
            pvalue: fields[2].to_string(),
            percent_target,
        });
    }
    Ok(motifs)
}

/// Parse a Homer `homerMotifs.all.motifs` file.
///
/// Only `>` header lines are inspected; lines without a usable
/// `T:count(percent%)` token are skipped.
pub fn parse_denovo_motifs<P: AsRef<Path>>(path: P) -> io::Result<Vec<DenovoMotif>> {
    let path = path.as_ref();
    let logo_dir = path
        .parent()
        .map(|dir| dir.join("homerResults"))
        .unwrap_or_else(|| PathBuf::from("homerResults"));

    let reader = open_line_reader(path)?;
    let mut lines = LineIterator::new(reader);
    let mut motifs = Vec::new();

    while let Some(line) = lines.next_line() {
        let (_, line) = line?;
        let Some(header) = line.strip_prefix('>') else {
            continue;
        };
        let fields: Vec<&str> = header.split('\t').collect();
        let consensus = fields[0];
        let motif_id = fields.get(1).copied().unwrap_or(consensus);

        let Some(target_info) = fields.iter().find(|f| f.starts_with("T:")) else {
            continue;
        };
        let Some(percent_target) = parse_target_percent(target_info) else {
            continue;
        };
        let pvalue = parse_pvalue(target_info);

        // "1-CONSENSUS" -> logo file motif1.logo.svg
        let motif_num = motif_id.split('-').next().unwrap_or(motif_id);
        let logo_path = logo_dir.join(format!("motif{motif_num}.logo.svg"));
        let logo = logo_path.exists().then_some(logo_path);

        motifs.push(DenovoMotif {
            consensus: consensus.to_string(),
            pvalue,
            percent_target,
            logo,
        });
    }
    Ok(motifs)
}

/// Extract the percentage from a `T:123.0(45.67%)` token
fn parse_target_percent(target_info: &str) -> Option<f64> {
    let open = target_info.find('(')?;
    let rest = &target_info[open + 1..];
    let pct_end = rest.find("%)")?;
    rest[..pct_end].parse().ok()
}

/// Extract the p-value following `P:`, e.g. `P:1e-245`
fn parse_pvalue(target_info: &str) -> Option<String> {
    let start = target_info.find("P:")? + 2;
    let value: String = target_info[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == 'e' || *c == '-')
        .collect();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
