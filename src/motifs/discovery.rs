//! Condition discovery over the Homer results directory layout
//!
//! The pipeline writes motif results into a fixed two-level convention:
//!
//! ```text
//! <root>/consensus_peaks/<condition>_motifs/knownResults.txt
//! <root>/consensus_peaks/<condition>_motifs/homerMotifs.all.motifs
//! <root>/merged_peaks/merged_peaks_motifs/...
//! ```
//!
//! Per-condition directories are visited in name order and the designated
//! merged condition is appended last. A directory lacking the expected
//! result file is simply absent from the comparison.

use crate::formats::homer::{parse_denovo_motifs, parse_known_motifs, DenovoMotif, KnownMotif};
use std::io;
use std::path::Path;

/// File name of the known-motif results in each condition directory
pub const KNOWN_RESULTS_FILE: &str = "knownResults.txt";

/// File name of the de novo results in each condition directory
pub const DENOVO_RESULTS_FILE: &str = "homerMotifs.all.motifs";

/// Name of the merged condition; excluded from the derived aggregate columns
pub const MERGED_CONDITION: &str = "merged_peaks";

const CONSENSUS_SUBDIR: &str = "consensus_peaks";
const MERGED_SUBDIR: &str = "merged_peaks";
const CONDITION_DIR_SUFFIX: &str = "_motifs";

/// One condition with its parsed motif records
#[derive(Debug, Clone)]
pub struct Condition<T> {
    pub name: String,
    pub motifs: Vec<T>,
}

/// Discover conditions carrying a `knownResults.txt` file
pub fn discover_known(root: &Path) -> io::Result<Vec<Condition<KnownMotif>>> {
    discover(root, KNOWN_RESULTS_FILE, |p: &Path| parse_known_motifs(p))
}

/// Discover conditions carrying a `homerMotifs.all.motifs` file
pub fn discover_denovo(root: &Path) -> io::Result<Vec<Condition<DenovoMotif>>> {
    discover(root, DENOVO_RESULTS_FILE, |p: &Path| parse_denovo_motifs(p))
}

fn discover<T, F>(root: &Path, result_file: &str, parse: F) -> io::Result<Vec<Condition<T>>>
where
    F: Fn(&Path) -> io::Result<Vec<T>>,
{
    let mut conditions = Vec::new();

    let consensus_dir = root.join(CONSENSUS_SUBDIR);
    if consensus_dir.is_dir() {
        let mut entries: Vec<_> = std::fs::read_dir(&consensus_dir)?
            .collect::<io::Result<Vec<_>>>()?
            .into_iter()
            .map(|e| e.path())
            .collect();
        entries.sort();

        for dir in entries {
            if !dir.is_dir() {
                continue;
            }
            let Some(dir_name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !dir_name.ends_with(CONDITION_DIR_SUFFIX) {
                continue;
            }
            let results = dir.join(result_file);
            if !results.is_file() {
                log::debug!("no {result_file} under {}", dir.display());
                continue;
            }
            conditions.push(Condition {
                name: dir_name.replace(CONDITION_DIR_SUFFIX, ""),
                motifs: parse(&results)?,
            });
        }
    }

    let merged_results = root
        .join(MERGED_SUBDIR)
        .join(format!("{MERGED_CONDITION}{CONDITION_DIR_SUFFIX}"))
        .join(result_file);
    if merged_results.is_file() {
        conditions.push(Condition {
            name: MERGED_CONDITION.to_string(),
            motifs: parse(&merged_results)?,
        });
    }

    Ok(conditions)
}
